#![cfg(test)]

use std::{
    collections::BTreeMap,
    convert::Infallible,
    future::Future,
    io,
    net::SocketAddr,
    path::Path,
    pin::Pin,
    sync::{Arc, LazyLock, Mutex},
};

use http_body_util::{BodyExt, Full};
use hyper::{
    body::{self, Bytes},
    header::CONTENT_TYPE,
    server::conn::http1,
    service::service_fn,
    Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use simple_request::ClientBuilder;
use tokio::net::TcpListener;

mod fixtures;

#[must_use]
struct HyperFixtureHandle(String);

impl Drop for HyperFixtureHandle {
    fn drop(&mut self) {
        let failed_request = {
            let mut services = HYPER_SERVICE_FIXTURES.lock().unwrap();
            services
                .remove(&*self.0)
                .expect("fixture not found")
                .assertion_failed_request
        };
        if let Some(req) = failed_request {
            panic!("assertion failed for request {}: {:?}", self.0, req);
        }
    }
}

type FixtureAssertionResult = (Response<Full<Bytes>>, Result<(), Request<body::Incoming>>);

type HyperServiceFixtureCallback = Box<
    dyn Fn(Request<body::Incoming>) -> Pin<Box<dyn Future<Output = FixtureAssertionResult> + Send>>
        + Send
        + Sync,
>;
struct HyperServiceFixture {
    svc: HyperServiceFixtureCallback,
    assertion_failed_request: Option<Request<body::Incoming>>,
}

static HYPER_SERVICE_FIXTURES: Mutex<BTreeMap<String, HyperServiceFixture>> =
    Mutex::new(BTreeMap::new());

fn add_hyper_fixture<Fut>(
    url: impl Into<String>,
    svc_fn: impl Fn(Request<body::Incoming>) -> Fut + Send + Sync + 'static,
) -> HyperFixtureHandle
where
    Fut: Future<Output = FixtureAssertionResult> + Send + 'static,
{
    let mut url: String = url.into();
    if !url.starts_with('/') {
        url.insert(0, '/');
    }
    let svc: HyperServiceFixtureCallback = Box::new(move |req| {
        let fut: Pin<Box<dyn Future<Output = FixtureAssertionResult> + Send>> =
            Box::pin(svc_fn(req));
        fut
    });
    let fixture = HyperServiceFixture {
        svc,
        assertion_failed_request: None,
    };
    {
        let url = url.clone();
        let mut services = HYPER_SERVICE_FIXTURES.lock().unwrap();
        services.insert(url, fixture);
    }
    HyperFixtureHandle(url)
}

async fn handle_service(
    req: Request<body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_owned();
    let fut = {
        let services = HYPER_SERVICE_FIXTURES.lock().unwrap();
        match services.get(&*path) {
            Some(fixture) => (fixture.svc)(req),
            None => {
                let mut res = Response::new(Full::new(Bytes::from_static(b"no fixture")));
                *res.status_mut() = StatusCode::NOT_FOUND;
                return Ok(res);
            }
        }
    };
    let (response, result) = fut.await;

    if let Err(req) = result {
        let mut services = HYPER_SERVICE_FIXTURES.lock().unwrap();
        if let Some(fixture) = services.get_mut(&*path) {
            fixture.assertion_failed_request = Some(req);
        }
    }

    Ok(response)
}

async fn setup_hyper_impl() -> Result<String, io::Error> {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));

    let listener = TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.expect("accept failed");
            let io = TokioIo::new(stream);

            tokio::task::spawn(async move {
                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service_fn(handle_service))
                    .await
                {
                    eprintln!("Error serving connection: {err:?}");
                }
            });
        }
    });

    Ok(format!("http://127.0.0.1:{port}"))
}

static TOKIO_RT: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

/// Base URL of the fixture server, starting it on first use.
fn server_url() -> io::Result<String> {
    use tokio::sync::OnceCell;

    static HYPER_SERVICE_INIT: OnceCell<io::Result<String>> = OnceCell::const_new();
    TOKIO_RT.block_on(async {
        match HYPER_SERVICE_INIT.get_or_init(setup_hyper_impl).await {
            Ok(url) => Ok(url.clone()),
            Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
        }
    })
}

fn fixture_url(path: &str) -> String {
    let base = server_url().unwrap();
    format!("{base}/{}", path.trim_start_matches('/'))
}

/// A builder saving into `save_dir` that never picks up proxies from the environment.
fn init_builder(save_dir: &Path) -> ClientBuilder {
    ClientBuilder::default()
        .save_directory(save_dir)
        .no_system_proxy()
}

fn json_response(status: StatusCode, value: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(value.to_string())))
        .unwrap()
}

fn header_value(req: &Request<body::Incoming>, name: impl hyper::header::AsHeaderName) -> String {
    req.headers()
        .get(name)
        .map(|v| v.to_str().unwrap_or_default().to_owned())
        .unwrap_or_default()
}

async fn collect_body(req: Request<body::Incoming>) -> Bytes {
    req.into_body().collect().await.unwrap().to_bytes()
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber recording every diagnostic emitted on the current thread.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
    (result, output)
}
