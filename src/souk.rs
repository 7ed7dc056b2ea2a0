//! High-level marketplace client with integrated session, cart, and
//! submission flow.
//!
//! [`Souk`] (async) and [`SoukBlocking`] are the application-state
//! handle of the design: one explicit value owning the HTTP client,
//! the login session, the cart, and the durable session storage. Views
//! receive a reference to it instead of reaching for ambient
//! singletons. All methods take `&self`; interior mutability follows
//! the storage-trait convention and no lock is ever held across an
//! await point.

use crate::error::SoukError;

/// Default fallback recipient: the marketplace order desk's chat
/// number, in international format without `+`.
const DEFAULT_FALLBACK_PHONE: &str = "22236000000";

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> SoukError {
    SoukError::Storage(err.to_string().into())
}

/// Generates a high-level Souk facade (async or blocking).
macro_rules! define_souk {
    (
        facade_name: $facade:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        storage_trait: $storage_trait:ident,
        facade_doc: $facade_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $storage_trait> {
            /// Base URL override (for testing).
            base_url: Option<String>,
            /// Durable session storage backend.
            storage: Option<S>,
            /// Fallback chat recipient phone number.
            fallback_phone: Option<String>,
            /// Notification sink override.
            notices: Option<Box<dyn NoticeSink>>,
        }

        impl<S: $storage_trait> $builder<S> {
            /// Overrides the base URL (useful for testing with a mock
            /// server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the durable session storage backend.
            #[inline]
            #[must_use]
            pub fn storage(mut self, storage: S) -> Self {
                self.storage = Some(storage);
                self
            }

            /// Sets the chat recipient of the fallback deep link
            /// (international format, no `+`).
            #[inline]
            #[must_use]
            pub fn fallback_phone<T: Into<String>>(mut self, phone: T) -> Self {
                self.fallback_phone = Some(phone.into());
                self
            }

            /// Sets the sink receiving user-visible notices
            /// (default: [`TracingSink`]).
            #[inline]
            #[must_use]
            pub fn notices(mut self, sink: Box<dyn NoticeSink>) -> Self {
                self.notices = Some(sink);
                self
            }

            /// Builds the facade.
            ///
            /// The session starts anonymous; call `restore_session` to
            /// rehydrate it from storage before first use.
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::Storage`] if no storage backend was
            /// provided, or [`SoukError::Http`] if the HTTP client
            /// fails to build.
            #[inline]
            pub fn build(self) -> Result<$facade<S>> {
                let storage = self.storage.ok_or_else(|| {
                    SoukError::Storage("session storage backend is required".into())
                })?;

                let mut client_builder = <$http_client>::builder();
                if let Some(url) = self.base_url {
                    client_builder = client_builder.base_url(url);
                }
                let client = client_builder.build()?;

                Ok($facade {
                    client,
                    storage,
                    session: Mutex::new(Session::new()),
                    cart: Mutex::new(Cart::new()),
                    notices: self.notices.unwrap_or_else(|| Box::new(TracingSink)),
                    fallback_phone: self
                        .fallback_phone
                        .unwrap_or_else(|| DEFAULT_FALLBACK_PHONE.to_owned()),
                    submitting: AtomicBool::new(false),
                })
            }
        }

        #[doc = $facade_doc]
        #[derive(Debug)]
        pub struct $facade<S: $storage_trait> {
            /// Low-level HTTP client.
            client: $http_client,
            /// Durable session storage backend.
            storage: S,
            /// In-memory login state.
            session: Mutex<Session>,
            /// The active cart.
            cart: Mutex<Cart>,
            /// Side channel for user-visible notifications.
            notices: Box<dyn NoticeSink>,
            /// Fallback chat recipient phone number.
            fallback_phone: String,
            /// Set while a submission is in flight (re-entrancy guard).
            submitting: AtomicBool,
        }

        impl<S: $storage_trait> $facade<S> {
            /// Creates a new builder for configuring the facade.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<S> {
                $builder {
                    base_url: None,
                    storage: None,
                    fallback_phone: None,
                    notices: None,
                }
            }

            // ── Session ─────────────────────────────────────────────

            /// Rehydrates the login state from durable storage.
            ///
            /// Call once at process start, before first use. Returns
            /// `true` when a persisted session was found; with no
            /// stored token the state stays anonymous.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails to read.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn restore_session(&self) -> Result<bool> {
                let stored = self.storage.load() $( .$await_ext )? ?;
                match stored {
                    Some(record) => {
                        tracing::debug!(user = %record.user.id, "restoring persisted session");
                        self.client.set_token(SecretString::from(record.token.clone()))?;
                        let mut session = self.session.lock().map_err(|err| lock_error(&err))?;
                        session.restore(record);
                        Ok(true)
                    }
                    None => {
                        tracing::debug!("no persisted session; starting anonymous");
                        Ok(false)
                    }
                }
            }

            /// Logs in with the given credentials.
            ///
            /// Persists the token and user record to durable storage,
            /// then updates the in-memory state synchronously.
            ///
            /// # Errors
            ///
            /// Returns an error if the remote call or the storage
            /// write fails. Remote failures are also published as an
            /// [`Notice::ApiError`].
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, credentials: &Credentials) -> Result<UserRecord> {
                let response = match self.client.login(credentials) $( .$await_ext )? {
                    Ok(response) => response,
                    Err(err) => {
                        self.notices.publish(Notice::ApiError {
                            message: err.to_string(),
                        });
                        return Err(err);
                    }
                };
                self.install_session(response) $( .$await_ext )?
            }

            /// Registers a new account and logs it in.
            ///
            /// # Errors
            ///
            /// Returns an error if the remote call or the storage
            /// write fails. Remote failures are also published as an
            /// [`Notice::ApiError`].
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn signup(&self, request: &SignupRequest) -> Result<UserRecord> {
                let response = match self.client.signup(request) $( .$await_ext )? {
                    Ok(response) => response,
                    Err(err) => {
                        self.notices.publish(Notice::ApiError {
                            message: err.to_string(),
                        });
                        return Err(err);
                    }
                };
                self.install_session(response) $( .$await_ext )?
            }

            /// Persists and activates the session from an auth
            /// response.
            $($async_kw)? fn install_session(&self, response: AuthResponse) -> Result<UserRecord> {
                let token = SecretString::from(response.token.clone());
                self.storage
                    .store(StoredSession {
                        token: response.token,
                        user: response.user.clone(),
                    })
                    $( .$await_ext )? ?;
                self.client.set_token(token.clone())?;
                {
                    let mut session = self.session.lock().map_err(|err| lock_error(&err))?;
                    session.log_in(token, response.user.clone());
                }
                self.notices.publish(Notice::LoggedIn {
                    name: response.user.name.clone(),
                });
                Ok(response.user)
            }

            /// Logs out: notifies the backend best-effort, then clears
            /// durable storage, the in-memory state, and the client
            /// token.
            ///
            /// The notification is fire-and-forget; its failure is
            /// logged and never surfaced.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails to clear.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn logout(&self) -> Result<()> {
                if let Err(err) = self.client.notify_logout() $( .$await_ext )? {
                    tracing::debug!(error = %err, "logout notification failed");
                }
                self.storage.clear() $( .$await_ext )? ?;
                {
                    let mut session = self.session.lock().map_err(|err| lock_error(&err))?;
                    session.log_out();
                }
                self.client.clear_token()?;
                self.notices.publish(Notice::LoggedOut);
                Ok(())
            }

            /// Returns `true` when a user is logged in.
            ///
            /// # Errors
            ///
            /// Returns an error if the session lock is poisoned.
            #[inline]
            pub fn is_logged_in(&self) -> Result<bool> {
                let session = self.session.lock().map_err(|err| lock_error(&err))?;
                Ok(session.is_logged_in())
            }

            /// Returns the current user record, if logged in.
            ///
            /// # Errors
            ///
            /// Returns an error if the session lock is poisoned.
            #[inline]
            pub fn current_user(&self) -> Result<Option<UserRecord>> {
                let session = self.session.lock().map_err(|err| lock_error(&err))?;
                Ok(session.user().cloned())
            }

            // ── Cart ────────────────────────────────────────────────

            /// Adds a shopping product to the cart (merging by ID) and
            /// publishes the confirmation notice.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn add_product(&self, product: &Product) -> Result<()> {
                self.add_line(CartLine::for_product(product))
            }

            /// Adds a restaurant menu item to the cart under its
            /// composite line ID, annotated with the restaurant name.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn add_menu_item(&self, restaurant: &Restaurant, item: &MenuItem) -> Result<()> {
                self.add_line(CartLine::for_menu_item(restaurant, item))
            }

            /// Adds a prepared cart line (merging by ID) and publishes
            /// the confirmation notice naming the item.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn add_line(&self, line: CartLine) -> Result<()> {
                let name = line.name.clone();
                {
                    let mut cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                    let _merged = cart.add(line);
                }
                self.notices.publish(Notice::ItemAdded { name });
                Ok(())
            }

            /// Removes a cart line; no-op if absent.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn remove_line(&self, id: &LineId) -> Result<()> {
                let mut cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                cart.remove(id);
                Ok(())
            }

            /// Sets a line's quantity, clamping to a minimum of 1.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn set_quantity(&self, id: &LineId, quantity: u32) -> Result<()> {
                let mut cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                cart.set_quantity(id, quantity);
                Ok(())
            }

            /// Returns a snapshot of the cart lines in insertion order.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn cart_lines(&self) -> Result<Vec<CartLine>> {
                let cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                Ok(cart.lines().to_vec())
            }

            /// Returns the current cart total, recomputed fresh.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn cart_total(&self) -> Result<Amount> {
                let cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                Ok(cart.total_amount())
            }

            /// Returns the total number of units in the cart.
            ///
            /// # Errors
            ///
            /// Returns an error if the cart lock is poisoned.
            #[inline]
            pub fn cart_item_count(&self) -> Result<u64> {
                let cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                Ok(cart.total_item_count())
            }

            // ── Submission flow ─────────────────────────────────────

            /// Submits the current cart exactly once per user action.
            ///
            /// - anonymous: no network call; returns the pre-filled
            ///   chat deep link, cart untouched,
            /// - authenticated, backend accepts: the submitted lines
            ///   are removed from the cart, returns
            ///   [`SubmitOutcome::Placed`],
            /// - authenticated, backend fails (non-2xx, transport, or
            ///   parse error): returns the chat deep link and keeps
            ///   the cart so the user can retry — the failed remote
            ///   order is not retried automatically, which leaves a
            ///   deliberate duplicate risk if the chat order is also
            ///   honored,
            /// - a second trigger while one submission is in flight is
            ///   ignored and reported as [`SubmitOutcome::InFlight`].
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::EmptyCart`] when the cart has no
            /// lines, or an error if a lock is poisoned or the
            /// fallback link cannot be built.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn checkout(&self) -> Result<SubmitOutcome> {
                let Some(guard) = SubmitGuard::acquire(&self.submitting) else {
                    tracing::debug!("submission already in flight; ignoring trigger");
                    return Ok(SubmitOutcome::InFlight);
                };
                let outcome = self.submit_once() $( .$await_ext )?;
                drop(guard);
                outcome
            }

            /// Runs one submission attempt under the guard.
            $($async_kw)? fn submit_once(&self) -> Result<SubmitOutcome> {
                // Snapshot by value: later cart mutation must not
                // affect this submission.
                let (lines, total) = {
                    let cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                    (cart.lines().to_vec(), cart.total_amount())
                };
                if lines.is_empty() {
                    return Err(SoukError::EmptyCart);
                }

                let identity_snapshot = {
                    let session = self.session.lock().map_err(|err| lock_error(&err))?;
                    session.snapshot()
                };
                let Some(identity) = identity_snapshot else {
                    tracing::debug!("anonymous submission; routing to chat fallback");
                    return self.fall_back(&lines, total);
                };

                let order = Order {
                    items: lines.clone(),
                    total,
                    order_date: Utc::now(),
                    user_id: identity.user.id,
                };
                match self.client.place_order(&order) $( .$await_ext )? {
                    Ok(receipt) => {
                        {
                            // Drop only the submitted snapshot; a line
                            // added while the call was in flight stays
                            // for the next order.
                            let submitted: Vec<LineId> =
                                lines.iter().map(|line| line.id.clone()).collect();
                            let mut cart = self.cart.lock().map_err(|err| lock_error(&err))?;
                            cart.remove_many(&submitted);
                        }
                        self.notices.publish(Notice::OrderPlaced {
                            order_id: receipt.order_id.clone(),
                            total,
                        });
                        Ok(SubmitOutcome::Placed(receipt.order_id))
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "order submission failed; routing to chat fallback");
                        self.notices.publish(Notice::SubmissionFailed {
                            message: err.to_string(),
                        });
                        // Cart intentionally kept for a later retry.
                        self.fall_back(&lines, total)
                    }
                }
            }

            /// Produces the chat deep link outcome.
            fn fall_back(&self, lines: &[CartLine], total: Amount) -> Result<SubmitOutcome> {
                let link = fallback_link(&self.fallback_phone, lines, total)?;
                self.notices.publish(Notice::FallbackUsed);
                Ok(SubmitOutcome::Fallback(link))
            }

            // ── Store management ────────────────────────────────────

            /// Uploads a product image (multipart). Requires an
            /// authenticated session.
            ///
            /// # Errors
            ///
            /// Returns [`SoukError::NotAuthenticated`] while anonymous,
            /// or an error if the remote call fails (also published as
            /// an [`Notice::ApiError`]).
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn upload_image(
                &self,
                file_name: String,
                bytes: Vec<u8>,
                mime: &str,
            ) -> Result<UploadedImage> {
                if !self.is_logged_in()? {
                    return Err(SoukError::NotAuthenticated);
                }
                match self.client.upload_image(file_name, bytes, mime) $( .$await_ext )? {
                    Ok(uploaded) => Ok(uploaded),
                    Err(err) => {
                        self.notices.publish(Notice::ApiError {
                            message: err.to_string(),
                        });
                        Err(err)
                    }
                }
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_souk {
    //! Async facade.

    use core::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    use chrono::Utc;
    use secrecy::SecretString;

    use super::{DEFAULT_FALLBACK_PHONE, lock_error};
    use crate::cart::Cart;
    use crate::checkout::{SubmitGuard, SubmitOutcome, fallback_link};
    use crate::client::SoukClient;
    use crate::error::{Result, SoukError};
    use crate::models::{
        Amount, AuthResponse, CartLine, Credentials, LineId, MenuItem, Order, Product, Restaurant,
        SignupRequest, StoredSession, UploadedImage, UserRecord,
    };
    use crate::notice::{Notice, NoticeSink, TracingSink};
    use crate::session::Session;
    use crate::storage::SessionStorage;

    define_souk! {
        facade_name: Souk,
        builder_name: SoukBuilder,
        http_client: SoukClient,
        storage_trait: SessionStorage,
        facade_doc: "Async high-level marketplace client.\n\nOwns the HTTP client, login session, cart, and durable session\nstorage behind one application-state handle. Use\n[`Souk::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Souk`] facade.",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_souk {
    //! Blocking facade.

    use core::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    use chrono::Utc;
    use secrecy::SecretString;

    use super::{DEFAULT_FALLBACK_PHONE, lock_error};
    use crate::cart::Cart;
    use crate::checkout::{SubmitGuard, SubmitOutcome, fallback_link};
    use crate::client::SoukBlockingClient;
    use crate::error::{Result, SoukError};
    use crate::models::{
        Amount, AuthResponse, CartLine, Credentials, LineId, MenuItem, Order, Product, Restaurant,
        SignupRequest, StoredSession, UploadedImage, UserRecord,
    };
    use crate::notice::{Notice, NoticeSink, TracingSink};
    use crate::session::Session;
    use crate::storage::BlockingSessionStorage;

    define_souk! {
        facade_name: SoukBlocking,
        builder_name: SoukBlockingBuilder,
        http_client: SoukBlockingClient,
        storage_trait: BlockingSessionStorage,
        facade_doc: "Blocking high-level marketplace client.\n\nOwns the HTTP client, login session, cart, and durable session\nstorage behind one application-state handle. Use\n[`SoukBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`SoukBlocking`] facade.",
    }
}

#[cfg(feature = "async")]
pub use async_souk::{Souk, SoukBuilder};
#[cfg(feature = "blocking")]
pub use blocking_souk::{SoukBlocking, SoukBlockingBuilder};
