mod empty_body;
mod invalid_json;
