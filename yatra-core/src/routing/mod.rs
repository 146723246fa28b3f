//! Boundary to external routing services.
//!
//! A [`RoutingProvider`] turns an ordered list of coordinates into route
//! geometry, a distance/duration summary and turn-by-turn instructions. Each
//! call yields a [`RouteOverlay`] (the display resource the controller owns)
//! and a future carrying the eventual [`ProviderRoute`] or
//! [`ProviderError`].

mod error;
mod provider;

pub use error::ProviderError;
pub use provider::{
    BoxFuture, OverlayStatus, ProviderCall, ProviderRoute, RouteFuture, RouteInstruction,
    RouteOverlay, RoutingProvider,
};
