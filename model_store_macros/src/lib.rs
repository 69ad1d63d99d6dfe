mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)]
// ============================================================================

/// Derive macro that implements `model_store::Model` for a struct.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Model)]
/// #[model(collection = "games")]
/// struct Game {
///     #[model(id)]
///     pub slug: String,
///     pub name: String,
/// }
/// ```
///
/// - `collection` defaults to the snake_case struct name plus `s`.
/// - The identifier is the field marked `#[model(id)]`, or a field named `id`.
///   Its type becomes `Model::Id`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}
