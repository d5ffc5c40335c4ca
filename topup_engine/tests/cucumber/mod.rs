mod steps;
mod storefront_world;

pub use storefront_world::StorefrontWorld;
