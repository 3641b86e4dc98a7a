use std::{collections::BTreeMap, fmt, str::FromStr};

use serde_json::Value;

use crate::Error;

/// HTTP methods supported by [`crate::RequestClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// The uppercase method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parse a method name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else {
            Err(Error::UnsupportedMethod(s.to_owned()))
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// A single request to be sent by [`crate::RequestClient::send`].
///
/// Headers and cookies set here are merged with the client defaults; on a name collision the
/// values set on the request win.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) json: Option<Value>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) cookies: BTreeMap<String, String>,
}

impl Request {
    /// Create a request with the given method and URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: vec![],
            json: None,
            headers: vec![],
            cookies: BTreeMap::new(),
        }
    }

    /// Create a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Create a `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Append a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append all query parameters from an iterator.
    pub fn with_query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append query parameters taken from a JSON value.
    ///
    /// An object contributes one parameter per key; array values repeat the key once per
    /// element. An array of `[name, value]` pairs is accepted as well. Strings are used as-is,
    /// other scalars are rendered as JSON text and `null`s are skipped.
    ///
    /// A string is taken as an already encoded query such as `a=1&b=2`.
    pub fn with_query_json(mut self, params: &Value) -> Self {
        match params {
            Value::Object(map) => {
                for (name, value) in map {
                    push_query_value(&mut self.query, name, value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Some([Value::String(name), value]) = item.as_array().map(Vec::as_slice)
                    {
                        push_query_value(&mut self.query, name, value);
                    }
                }
            }
            Value::String(raw) => {
                let raw = raw.strip_prefix('?').unwrap_or(raw.as_str());
                self.query
                    .extend(form_urlencoded::parse(raw.as_bytes()).into_owned());
            }
            Value::Null => {}
            other => tracing::warn!(params = %other, "query parameters must be an object"),
        }
        self
    }

    /// Send the given value as a JSON body.
    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a header. A later header with the same name, compared case-insensitively, replaces
    /// this one.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        crate::header::insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Add all headers from an iterator.
    pub fn with_headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |req, (k, v)| req.with_header(k, v))
    }

    /// Add a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Get the method of this request.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get the URL of this request.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, name: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => query.push((name.to_owned(), s.clone())),
        Value::Array(items) => {
            for item in items {
                push_query_value(query, name, item);
            }
        }
        other => query.push((name.to_owned(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("GeT".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        let err = "put".parse::<Method>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(reqwest::Method::from(Method::Get), reqwest::Method::GET);
    }

    #[test]
    fn test_request_builder() {
        let req = Request::post("https://api.example.com/items")
            .with_query("page", "1")
            .with_query_pairs([("size", "20")])
            .with_json(json!({"name": "widget"}))
            .with_header("Accept", "text/plain")
            .with_headers([("accept", "application/json")])
            .with_cookie("session", "abc");
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.url(), "https://api.example.com/items");
        assert_eq!(
            req.query,
            vec![
                ("page".to_owned(), "1".to_owned()),
                ("size".to_owned(), "20".to_owned())
            ]
        );
        assert_eq!(
            req.headers,
            vec![("accept".to_owned(), "application/json".to_owned())]
        );
        assert_eq!(req.json, Some(json!({"name": "widget"})));
        assert_eq!(req.cookies["session"], "abc");
    }

    #[test]
    fn test_query_from_json() {
        let req = Request::get("https://api.example.com/items").with_query_json(&json!({
            "q": "café",
            "page": 2,
            "exact": true,
            "skip": null,
            "tag": ["a", "b"],
        }));
        let query: Vec<_> = req
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            query,
            [
                ("exact", "true"),
                ("page", "2"),
                ("q", "café"),
                ("tag", "a"),
                ("tag", "b"),
            ]
        );

        let req = Request::get("https://api.example.com/items")
            .with_query_json(&json!([["b", "2"], ["a", 1], "junk"]));
        assert_eq!(
            req.query,
            vec![
                ("b".to_owned(), "2".to_owned()),
                ("a".to_owned(), "1".to_owned())
            ]
        );

        let req = Request::get("https://api.example.com/items").with_query_json(&json!(42));
        assert!(req.query.is_empty());
    }

    #[test]
    fn test_query_from_encoded_string() {
        let req = Request::get("https://api.example.com/items")
            .with_query("first", "0")
            .with_query_json(&json!("?a=1&b=x%20y&c=caf%C3%A9+au+lait"));
        assert_eq!(
            req.query,
            vec![
                ("first".to_owned(), "0".to_owned()),
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "x y".to_owned()),
                ("c".to_owned(), "café au lait".to_owned()),
            ]
        );

        let req = Request::get("https://api.example.com/items").with_query_json(&json!(""));
        assert!(req.query.is_empty());
    }
}
