//! Low-level HTTP client for the Souk marketplace API.
//!
//! Provides both async and blocking client variants behind feature
//! flags. The client attaches the bearer token when one is set, speaks
//! JSON for regular endpoints and multipart for image uploads, and
//! surfaces server errors uniformly so call sites can apply fallback
//! logic.

use serde::Deserialize;

/// Base URL for the Souk marketplace API.
const DEFAULT_BASE_URL: &str = "https://api.souk.mr";

/// Order submission endpoint path.
const ORDERS_PATH: &str = "/orders";

/// Login endpoint path.
const LOGIN_PATH: &str = "/auth/login";

/// Signup endpoint path.
const SIGNUP_PATH: &str = "/auth/signup";

/// Logout notification endpoint path.
const LOGOUT_PATH: &str = "/auth/logout";

/// Multipart image upload endpoint path.
const UPLOAD_PATH: &str = "/uploads";

/// JSON error body shape returned by the API on failures.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    /// Human-readable error message.
    message: String,
}

/// Renders the uniform error message for a non-success response.
///
/// Tries the JSON error body first; falls back to a generic line
/// carrying the status code.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body).map_or_else(
        |_| format!("server communication error: {status}"),
        |parsed| parsed.message,
    )
}

/// Generates a Souk API client (async or blocking) with builder,
/// endpoint methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        multipart_form: $form:ty,
        multipart_part: $part:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug, Default)]
        pub struct $builder {
            /// Initial bearer token, if the session is already known.
            token: Option<SecretString>,
            /// Base URL override (for testing).
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets the initial bearer token.
            ///
            /// The token can also be set or replaced later with
            /// `set_token` on the built client, which is what the
            /// facade does on login.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Overrides the base URL (useful for testing with a mock
            /// server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// Anonymous clients are valid: login and signup work
            /// without a token, and the submission flow never reaches
            /// the network while anonymous.
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::Http`] if the HTTP client fails to
            /// build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token: Mutex::new(self.token),
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer token; `None` while anonymous. Interior-mutable
            /// because the session changes at runtime.
            token: Mutex<Option<SecretString>>,
            /// API base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Installs the bearer token attached to subsequent
            /// requests.
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::Storage`] if the token lock is
            /// poisoned.
            #[inline]
            pub fn set_token(&self, token: SecretString) -> Result<()> {
                let mut slot = self
                    .token
                    .lock()
                    .map_err(|err| SoukError::Storage(err.to_string().into()))?;
                *slot = Some(token);
                Ok(())
            }

            /// Removes the bearer token; subsequent requests go out
            /// anonymous.
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::Storage`] if the token lock is
            /// poisoned.
            #[inline]
            pub fn clear_token(&self) -> Result<()> {
                let mut slot = self
                    .token
                    .lock()
                    .map_err(|err| SoukError::Storage(err.to_string().into()))?;
                *slot = None;
                Ok(())
            }

            /// Reads a clone of the current token without holding the
            /// lock across a request.
            fn current_token(&self) -> Result<Option<SecretString>> {
                let slot = self
                    .token
                    .lock()
                    .map_err(|err| SoukError::Storage(err.to_string().into()))?;
                Ok(slot.clone())
            }

            /// Submits an order via `POST /orders`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized. Callers route any of these to the chat
            /// fallback.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn place_order(&self, order: &Order) -> Result<OrderReceipt> {
                tracing::debug!(items = order.items.len(), total = %order.total, "submitting order");
                self.post_json(ORDERS_PATH, order) $( .$await_ext )?
            }

            /// Authenticates via `POST /auth/login`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
                tracing::debug!("calling login endpoint");
                self.post_json(LOGIN_PATH, credentials) $( .$await_ext )?
            }

            /// Registers a new account via `POST /auth/signup`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
                tracing::debug!("calling signup endpoint");
                self.post_json(SIGNUP_PATH, request) $( .$await_ext )?
            }

            /// Notifies the backend of a logout via `POST /auth/logout`.
            ///
            /// Treats `204 No Content` (and any 2xx) as a generic
            /// success marker without parsing a body. The facade calls
            /// this best-effort and ignores failures.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn notify_logout(&self) -> Result<()> {
                tracing::debug!("calling logout endpoint");
                self.post_unit(LOGOUT_PATH) $( .$await_ext )?
            }

            /// Uploads an image via multipart `POST /uploads`.
            ///
            /// The `Content-Type` header is derived from the multipart
            /// boundary by the HTTP layer and must not be set manually.
            ///
            /// # Errors
            ///
            /// Returns an error if the part cannot be built, the HTTP
            /// request fails, the server returns a non-success status,
            /// or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(file_name = %file_name))]
            pub $($async_kw)? fn upload_image(
                &self,
                file_name: String,
                bytes: Vec<u8>,
                mime: &str,
            ) -> Result<UploadedImage> {
                tracing::debug!(size = bytes.len(), "uploading image");
                let part = <$part>::bytes(bytes).file_name(file_name).mime_str(mime)?;
                let form = <$form>::new().part("file", part);

                let url = format!("{}{UPLOAD_PATH}", self.base_url);
                let mut request = self.http.post(&url);
                if let Some(token) = self.current_token()? {
                    request = request.header(
                        AUTHORIZATION,
                        format!("Bearer {}", token.expose_secret()),
                    );
                }
                let response: $resp_type = request.multipart(form).send() $( .$await_ext )? ?;
                self.parse_response(response) $( .$await_ext )?
            }

            /// Sends a JSON POST request and deserializes the response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn post_json<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                path: &str,
                request: &Req,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending POST request");
                let mut builder = self
                    .http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(request);
                if let Some(token) = self.current_token()? {
                    builder = builder.header(
                        AUTHORIZATION,
                        format!("Bearer {}", token.expose_secret()),
                    );
                }
                let response: $resp_type = builder.send() $( .$await_ext )? ?;
                self.parse_response(response) $( .$await_ext )?
            }

            /// Sends a bodyless JSON POST request, treating any 2xx
            /// (including `204 No Content`) as success.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn post_unit(&self, path: &str) -> Result<()> {
                let url = format!("{}{path}", self.base_url);
                let mut builder = self.http.post(&url);
                if let Some(token) = self.current_token()? {
                    builder = builder.header(
                        AUTHORIZATION,
                        format!("Bearer {}", token.expose_secret()),
                    );
                }
                let response: $resp_type = builder.send() $( .$await_ext )? ?;
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(())
                } else {
                    let body = response.text() $( .$await_ext )? .unwrap_or_default();
                    Err(SoukError::Api {
                        status: status.as_u16(),
                        message: error_message(status.as_u16(), &body),
                    })
                }
            }

            /// Classifies a response: 2xx parses the JSON body,
            /// anything else becomes an API error with the uniform
            /// message. Bodyless endpoints go through
            /// [`Self::post_unit`] instead.
            $($async_kw)? fn parse_response<Resp: serde::de::DeserializeOwned>(
                &self,
                response: $resp_type,
            ) -> Result<Resp> {
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(SoukError::from)
                } else {
                    let body = response.text() $( .$await_ext )? .unwrap_or_default();
                    let message = error_message(status.as_u16(), &body);
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(SoukError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_defaults_to_anonymous() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url, DEFAULT_BASE_URL);
                assert!(client.current_token().unwrap().is_none());
            }

            #[test]
            fn builder_custom_base_url() {
                let client = $client::builder()
                    .base_url("http://localhost:8080")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url, "http://localhost:8080");
            }

            #[test]
            fn token_can_be_set_and_cleared() {
                let client = $client::builder().token("tok-1").build().unwrap();
                assert!(client.current_token().unwrap().is_some());
                client.clear_token().unwrap();
                assert!(client.current_token().unwrap().is_none());
                client.set_token(SecretString::from("tok-2")).unwrap();
                assert!(client.current_token().unwrap().is_some());
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the Souk marketplace API.

    use std::sync::Mutex;

    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use secrecy::{ExposeSecret, SecretString};

    use super::{
        DEFAULT_BASE_URL, LOGIN_PATH, LOGOUT_PATH, ORDERS_PATH, SIGNUP_PATH, UPLOAD_PATH,
        error_message,
    };
    use crate::error::{Result, SoukError};
    use crate::models::{AuthResponse, Credentials, Order, OrderReceipt, SignupRequest, UploadedImage};

    define_client! {
        client_name: SoukClient,
        builder_name: SoukClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        multipart_form: reqwest::multipart::Form,
        multipart_part: reqwest::multipart::Part,
        client_doc: "Async client for the Souk marketplace API.\n\nUse [`SoukClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`SoukClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the Souk marketplace API.

    use std::sync::Mutex;

    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use secrecy::{ExposeSecret, SecretString};

    use super::{
        DEFAULT_BASE_URL, LOGIN_PATH, LOGOUT_PATH, ORDERS_PATH, SIGNUP_PATH, UPLOAD_PATH,
        error_message,
    };
    use crate::error::{Result, SoukError};
    use crate::models::{AuthResponse, Credentials, Order, OrderReceipt, SignupRequest, UploadedImage};

    define_client! {
        client_name: SoukBlockingClient,
        builder_name: SoukBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        multipart_form: reqwest::blocking::multipart::Form,
        multipart_part: reqwest::blocking::multipart::Part,
        client_doc: "Blocking (synchronous) client for the Souk marketplace API.\n\nUse [`SoukBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`SoukBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{SoukClient, SoukClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{SoukBlockingClient, SoukBlockingClientBuilder};
