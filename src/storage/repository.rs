//! Remote catalog access
//!
//! [`BookRepository`] is the contract the inventory store depends on: four
//! operations, one round trip each, no retries. [`HttpBookRepository`]
//! implements it over HTTP with a blocking `ureq` agent.
//!
//! | Operation | Request | Success body |
//! |-----------|---------|--------------|
//! | `list` | `GET {base}` | array of books |
//! | `create` | `POST {base}` | created book |
//! | `replace` | `PUT {base}/{id}` | updated book |
//! | `remove` | `DELETE {base}/{id}` | none |

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Book, BookId, BookPayload};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// `list` completed with a non-success status
    #[error("Failed to load books. (HTTP {status})")]
    Fetch { status: u16 },

    /// `create` or `replace` completed with a non-success status
    #[error("Unable to save the book. (HTTP {status})")]
    Save { status: u16 },

    /// `remove` completed with a non-success status
    #[error("Unable to delete the book. (HTTP {status})")]
    Delete { status: u16 },

    /// The request never completed: refused, timed out, DNS failure
    #[error("Could not reach the catalog service: {message}")]
    Transport { message: String },

    /// The id cannot be used as a single URL path segment
    #[error("Book id '{id}' cannot be used in a catalog URL")]
    InvalidId { id: String },

    /// The request completed but the body was not what the contract promises
    #[error("Unexpected response from the catalog service: {message}")]
    Decode { message: String },
}

/// CRUD contract of the remote catalog
pub trait BookRepository {
    /// Fetches the full collection
    fn list(&self) -> Result<Vec<Book>, RepositoryError>;

    /// Creates a record; the catalog assigns its id
    fn create(&self, payload: &BookPayload) -> Result<Book, RepositoryError>;

    /// Replaces every field of an existing record
    fn replace(&self, id: &BookId, payload: &BookPayload) -> Result<Book, RepositoryError>;

    /// Deletes a record
    fn remove(&self, id: &BookId) -> Result<(), RepositoryError>;
}

/// Which operation a failed status belongs to
#[derive(Debug, Clone, Copy)]
enum Operation {
    List,
    Save,
    Remove,
}

impl Operation {
    fn status_error(self, status: u16) -> RepositoryError {
        match self {
            Operation::List => RepositoryError::Fetch { status },
            Operation::Save => RepositoryError::Save { status },
            Operation::Remove => RepositoryError::Delete { status },
        }
    }
}

/// [`BookRepository`] over HTTP
pub struct HttpBookRepository {
    base_url: String,
    http: ureq::Agent,
}

impl HttpBookRepository {
    /// Creates a repository for the collection resource at `base_url`
    ///
    /// `timeout` bounds each whole request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url, http }
    }

    /// Returns the collection URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &BookId) -> Result<String, RepositoryError> {
        if let BookId::Text(text) = id {
            if !is_path_segment(text) {
                return Err(RepositoryError::InvalidId { id: text.clone() });
            }
        }
        Ok(format!("{}/{}", self.base_url, id))
    }

    fn send(
        &self,
        op: Operation,
        request: ureq::Request,
        body: Option<&BookPayload>,
    ) -> Result<ureq::Response, RepositoryError> {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let result = match body {
            Some(payload) => request.send_json(payload),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                debug!(%method, %url, status = response.status(), "catalog request completed");
                Ok(response)
            }
            Err(ureq::Error::Status(status, _)) => {
                debug!(%method, %url, status, "catalog request rejected");
                Err(op.status_error(status))
            }
            Err(ureq::Error::Transport(transport)) => {
                debug!(%method, %url, error = %transport, "catalog request failed");
                Err(RepositoryError::Transport {
                    message: transport.to_string(),
                })
            }
        }
    }

    fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, RepositoryError> {
        response.into_json().map_err(|e| RepositoryError::Decode {
            message: format!("failed to parse JSON: {}", e),
        })
    }
}

/// Text ids are sent unencoded, so only URL-unreserved characters are allowed
fn is_path_segment(text: &str) -> bool {
    !text.is_empty()
        && text != "."
        && text != ".."
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}

impl BookRepository for HttpBookRepository {
    fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let response = self.send(Operation::List, self.http.get(&self.base_url), None)?;
        Self::read_json(response)
    }

    fn create(&self, payload: &BookPayload) -> Result<Book, RepositoryError> {
        let response = self.send(
            Operation::Save,
            self.http.post(&self.base_url),
            Some(payload),
        )?;
        Self::read_json(response)
    }

    fn replace(&self, id: &BookId, payload: &BookPayload) -> Result<Book, RepositoryError> {
        let response = self.send(
            Operation::Save,
            self.http.put(&self.item_url(id)?),
            Some(payload),
        )?;
        Self::read_json(response)
    }

    fn remove(&self, id: &BookId) -> Result<(), RepositoryError> {
        let url = self.item_url(id)?;
        self.send(Operation::Remove, self.http.delete(&url), None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let repo = HttpBookRepository::new("http://localhost:8080/api/books/", Duration::from_secs(1));
        assert_eq!(repo.base_url(), "http://localhost:8080/api/books");
        assert_eq!(
            repo.item_url(&BookId::Numeric(5)).unwrap(),
            "http://localhost:8080/api/books/5"
        );
        assert_eq!(
            repo.item_url(&BookId::Text("b-17_x.2~".into())).unwrap(),
            "http://localhost:8080/api/books/b-17_x.2~"
        );
    }

    #[test]
    fn unsafe_text_ids_are_rejected_before_sending() {
        // Nothing listens on this address, so a request would be a transport error
        let repo = HttpBookRepository::new("http://127.0.0.1:9/api/books", Duration::from_secs(1));
        let payload = BookPayload {
            title: "T".into(),
            author: "A".into(),
            isbn: String::new(),
            published_year: None,
            genre: String::new(),
            quantity: 1,
        };

        for raw in ["a/b", "x?y=1", "two words", "..", ""] {
            let id = BookId::Text(raw.to_string());
            let expected = Err(RepositoryError::InvalidId { id: raw.to_string() });
            assert_eq!(repo.remove(&id), expected);
            assert_eq!(repo.replace(&id, &payload).map(|_| ()), expected);
        }
    }

    #[test]
    fn status_errors_match_operation() {
        assert_eq!(
            Operation::List.status_error(500),
            RepositoryError::Fetch { status: 500 }
        );
        assert_eq!(
            Operation::Save.status_error(400),
            RepositoryError::Save { status: 400 }
        );
        assert_eq!(
            Operation::Remove.status_error(404),
            RepositoryError::Delete { status: 404 }
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            RepositoryError::Fetch { status: 503 }.to_string(),
            "Failed to load books. (HTTP 503)"
        );
        assert!(RepositoryError::Transport {
            message: "connection refused".into()
        }
        .to_string()
        .contains("connection refused"));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/api/books", addr);
        let repo = HttpBookRepository::new(url, Duration::from_secs(2));
        assert!(matches!(
            repo.list(),
            Err(RepositoryError::Transport { .. })
        ));
    }
}
