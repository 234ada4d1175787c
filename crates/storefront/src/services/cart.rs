//! Session-scoped cart service.
//!
//! Glues the pure [`CartState`] machine to its two homes: the session (the
//! in-memory context that survives between requests) and the durable
//! [`CartStore`] collaborator. Every load reconciles the session state
//! against the freshest durable snapshot; every normal-mode mutation writes
//! through optimistically.
//!
//! Write-through failures are logged and not surfaced - the in-memory cart
//! remains the visible truth until the next snapshot reconciliation, which
//! may overwrite it with stale durable data (see
//! [`CartState::apply_snapshot`]). `clear` is the one operation that awaits
//! the external effect and propagates its failure.

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use orchard_core::ProductId;
use orchard_core::cart::{CartItem, CartState};

use crate::backend::{BackendError, CartStore};
use crate::models::session_keys;

/// Errors from cart service operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The session could not be read or written.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The durable store rejected an awaited operation.
    #[error("cart store error: {0}")]
    Store(#[from] BackendError),
}

/// Session-scoped cart operations over a durable store.
#[derive(Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    /// Create a new cart service over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the cart, reconciling against the durable snapshot.
    ///
    /// A failed snapshot fetch is logged and the session state stands as the
    /// visible truth.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    #[instrument(skip(self, session))]
    pub async fn load(&self, session: &Session) -> Result<CartState, CartServiceError> {
        let mut state = state_from_session(session).await?;

        if let Some(cart_id) = cart_id_from_session(session).await? {
            match self.store.load(&cart_id).await {
                Ok(Some(snapshot)) => state.apply_snapshot(snapshot),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(cart_id = %cart_id, "failed to load cart snapshot: {e}");
                }
            }
        }

        save_state(session, &state).await?;
        Ok(state)
    }

    /// Add an item, exiting buy-now mode (see [`CartState::add`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    #[instrument(skip(self, session, item), fields(product_id = %item.id))]
    pub async fn add(
        &self,
        session: &Session,
        item: CartItem,
    ) -> Result<CartState, CartServiceError> {
        let mut state = self.load(session).await?;
        state.add(item);
        save_state(session, &state).await?;
        self.write_through(session, &state).await?;
        Ok(state)
    }

    /// Remove the line with the given product id; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    #[instrument(skip(self, session))]
    pub async fn remove(
        &self,
        session: &Session,
        id: ProductId,
    ) -> Result<CartState, CartServiceError> {
        let mut state = self.load(session).await?;
        state.remove(id);
        save_state(session, &state).await?;
        self.write_through(session, &state).await?;
        Ok(state)
    }

    /// Set the quantity for a line verbatim (see
    /// [`CartState::update_quantity`] for the zero-quantity footgun).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    #[instrument(skip(self, session))]
    pub async fn update_quantity(
        &self,
        session: &Session,
        id: ProductId,
        quantity: i64,
    ) -> Result<CartState, CartServiceError> {
        let mut state = self.load(session).await?;
        state.update_quantity(id, quantity);
        save_state(session, &state).await?;
        self.write_through(session, &state).await?;
        Ok(state)
    }

    /// Empty the cart, exit buy-now mode, and clear durable storage.
    ///
    /// Unlike the other mutations this awaits the store and propagates its
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written or the store clear
    /// fails.
    #[instrument(skip(self, session))]
    pub async fn clear(&self, session: &Session) -> Result<CartState, CartServiceError> {
        let mut state = state_from_session(session).await?;
        state.clear();
        save_state(session, &state).await?;

        if let Some(cart_id) = cart_id_from_session(session).await? {
            self.store.clear(&cart_id).await?;
        }
        Ok(state)
    }

    /// Enter buy-now mode: the visible cart becomes exactly `[item]` and
    /// persistence writes are suppressed until the mode exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    #[instrument(skip(self, session, item), fields(product_id = %item.id))]
    pub async fn buy_now(
        &self,
        session: &Session,
        item: CartItem,
    ) -> Result<CartState, CartServiceError> {
        let mut state = state_from_session(session).await?;
        state.add_temporary(item);
        save_state(session, &state).await?;
        Ok(state)
    }

    /// Release whatever a just-placed order consumed.
    ///
    /// After a buy-now checkout only the temporary item was ordered: the mode
    /// exits and the accumulated cart (in memory and durable) is untouched.
    /// After a normal checkout the whole cart was ordered, so both the
    /// session state and durable storage are cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written or the store clear
    /// fails.
    #[instrument(skip(self, session))]
    pub async fn finish_checkout(&self, session: &Session) -> Result<CartState, CartServiceError> {
        let mut state = state_from_session(session).await?;

        if state.is_temporary() {
            state.drop_temporary();
            save_state(session, &state).await?;
            return Ok(state);
        }

        state.clear();
        save_state(session, &state).await?;
        if let Some(cart_id) = cart_id_from_session(session).await? {
            self.store.clear(&cart_id).await?;
        }
        Ok(state)
    }

    /// Write the persistable snapshot through to durable storage.
    ///
    /// Optimistic: failures are logged, never surfaced, and the in-memory
    /// state is not rolled back. Suppressed entirely in buy-now mode.
    async fn write_through(
        &self,
        session: &Session,
        state: &CartState,
    ) -> Result<(), CartServiceError> {
        let Some(snapshot) = state.persistable() else {
            return Ok(());
        };

        let cart_id = match cart_id_from_session(session).await? {
            Some(id) => id,
            None => match self.store.create().await {
                Ok(id) => {
                    session.insert(session_keys::CART_ID, &id).await?;
                    id
                }
                Err(e) => {
                    tracing::warn!("failed to create durable cart: {e}");
                    return Ok(());
                }
            },
        };

        if let Err(e) = self.store.save(&cart_id, &snapshot).await {
            tracing::warn!(cart_id = %cart_id, "cart write-through failed: {e}");
        }
        Ok(())
    }
}

async fn state_from_session(session: &Session) -> Result<CartState, CartServiceError> {
    Ok(session
        .get::<CartState>(session_keys::CART_STATE)
        .await?
        .unwrap_or_default())
}

async fn save_state(session: &Session, state: &CartState) -> Result<(), CartServiceError> {
    session.insert(session_keys::CART_STATE, state).await?;
    Ok(())
}

async fn cart_id_from_session(session: &Session) -> Result<Option<String>, CartServiceError> {
    Ok(session.get::<String>(session_keys::CART_ID).await?)
}
