use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level page load.
    Navigate,
    SameOrigin,
    Cors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub mode: RequestMode,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            mode: RequestMode::SameOrigin,
        }
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Where a response came from, relative to the worker's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same origin.
    Basic,
    Cors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            kind: ResponseKind::Basic,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

/// One named cache: URL to stored response.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: HashMap<String, Response>,
}

impl Cache {
    pub fn put(&mut self, url: impl Into<String>, response: Response) {
        self.entries.insert(url.into(), response);
    }

    pub fn get(&self, url: &str) -> Option<&Response> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named caches, searched in creation order.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Vec<(String, Cache)>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named cache, creating it when missing.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        let index = match self.caches.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.caches.push((name.to_string(), Cache::default()));
                self.caches.len() - 1
            }
        };
        &mut self.caches[index].1
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn names(&self) -> Vec<String> {
        self.caches.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.caches.len();
        self.caches.retain(|(n, _)| n != name);
        self.caches.len() != before
    }

    /// First stored response for `url` across all caches.
    pub fn lookup(&self, url: &str) -> Option<&Response> {
        self.caches.iter().find_map(|(_, cache)| cache.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_once() {
        let mut storage = CacheStorage::new();
        storage.open("v1").put("/", Response::ok("home"));
        storage.open("v1").put("/app.js", Response::ok("js"));
        assert_eq!(storage.names(), vec!["v1"]);
        assert_eq!(storage.get("v1").map(Cache::len), Some(2));
    }

    #[test]
    fn lookup_searches_in_creation_order() {
        let mut storage = CacheStorage::new();
        storage.open("old").put("/", Response::ok("old home"));
        storage.open("new").put("/", Response::ok("new home"));
        storage.open("new").put("/only-new", Response::ok("x"));

        assert_eq!(storage.lookup("/").map(|r| r.body.as_slice()), Some(&b"old home"[..]));
        assert!(storage.lookup("/only-new").is_some());
        assert!(storage.lookup("/missing").is_none());

        assert!(storage.delete("old"));
        assert!(!storage.delete("old"));
        assert_eq!(storage.lookup("/").map(|r| r.body.as_slice()), Some(&b"new home"[..]));
    }

    #[test]
    fn only_same_origin_200_is_cacheable() {
        assert!(Response::ok("").is_cacheable());
        let mut not_found = Response::ok("");
        not_found.status = 404;
        assert!(!not_found.is_cacheable());
        let mut cors = Response::ok("");
        cors.kind = ResponseKind::Cors;
        assert!(!cors.is_cacheable());
    }
}
