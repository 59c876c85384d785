//! Route matching module
//!
//! The book API routes are a static table of (method, path rule) -> operation,
//! evaluated in order; the first matching entry wins.

use hyper::Method;

/// Operation selected for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListBooks,
    GetBook,
    CreateBook,
    UpdateBook,
    DeleteBook,
    /// CORS preflight, answered without touching the store
    Preflight,
}

/// Path rule of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// Path must equal the value
    Exact(&'static str),
    /// Path must start with the value
    Prefix(&'static str),
    /// Any path
    Any,
}

impl PathMatch {
    pub fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix),
            Self::Any => true,
        }
    }
}

/// One entry of the route table
#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub path: PathMatch,
    pub operation: Operation,
}

/// Book API route table, in precedence order
pub static ROUTES: [Route; 6] = [
    Route {
        method: Method::GET,
        path: PathMatch::Exact("/books"),
        operation: Operation::ListBooks,
    },
    Route {
        method: Method::GET,
        path: PathMatch::Prefix("/books/"),
        operation: Operation::GetBook,
    },
    Route {
        method: Method::POST,
        path: PathMatch::Exact("/books"),
        operation: Operation::CreateBook,
    },
    Route {
        method: Method::PUT,
        path: PathMatch::Prefix("/books/"),
        operation: Operation::UpdateBook,
    },
    Route {
        method: Method::DELETE,
        path: PathMatch::Prefix("/books/"),
        operation: Operation::DeleteBook,
    },
    Route {
        method: Method::OPTIONS,
        path: PathMatch::Any,
        operation: Operation::Preflight,
    },
];

/// Find the operation for a method and path.
///
/// Methods are compared case-sensitively, so `get` is not `GET`.
pub fn match_route(method: &str, path: &str) -> Option<Operation> {
    match_in(&ROUTES, method, path)
}

fn match_in(routes: &[Route], method: &str, path: &str) -> Option<Operation> {
    let method = Method::from_bytes(method.as_bytes()).ok()?;
    routes
        .iter()
        .find(|route| route.method == method && route.path.matches(path))
        .map(|route| route.operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_path_exact() {
        let rule = PathMatch::Exact("/books");
        assert!(rule.matches("/books"));
        assert!(!rule.matches("/books/"));
        assert!(!rule.matches("/books/1"));
    }

    #[test]
    fn test_match_path_prefix() {
        let rule = PathMatch::Prefix("/books/");
        assert!(rule.matches("/books/"));
        assert!(rule.matches("/books/1"));
        assert!(rule.matches("/books/1/reviews"));
        assert!(!rule.matches("/books"));
        assert!(!rule.matches("/bookshelf/1"));
    }

    #[test]
    fn test_book_routes() {
        assert_eq!(match_route("GET", "/books"), Some(Operation::ListBooks));
        assert_eq!(match_route("GET", "/books/1"), Some(Operation::GetBook));
        assert_eq!(match_route("POST", "/books"), Some(Operation::CreateBook));
        assert_eq!(match_route("PUT", "/books/1"), Some(Operation::UpdateBook));
        assert_eq!(match_route("DELETE", "/books/1"), Some(Operation::DeleteBook));
    }

    #[test]
    fn test_options_matches_any_path() {
        for path in ["/books", "/books/7", "/unknown", ""] {
            assert_eq!(match_route("OPTIONS", path), Some(Operation::Preflight));
        }
    }

    #[test]
    fn test_unmatched_routes() {
        assert_eq!(match_route("GET", "/unknown"), None);
        assert_eq!(match_route("POST", "/books/1"), None);
        assert_eq!(match_route("PUT", "/books"), None);
        assert_eq!(match_route("DELETE", "/books"), None);
        assert_eq!(match_route("PATCH", "/books/1"), None);
        assert_eq!(match_route("get", "/books"), None);
        assert_eq!(match_route("", "/books"), None);
    }

    #[test]
    fn test_match_route_order() {
        let routes = [
            Route {
                method: Method::GET,
                path: PathMatch::Prefix("/books/"),
                operation: Operation::GetBook,
            },
            Route {
                method: Method::GET,
                path: PathMatch::Any,
                operation: Operation::ListBooks,
            },
        ];

        // Should match first applicable route in order
        assert_eq!(match_in(&routes, "GET", "/books/1"), Some(Operation::GetBook));
        assert_eq!(match_in(&routes, "GET", "/other"), Some(Operation::ListBooks));
    }
}
