//! Derive macros for TodoMVC channel messages
//!
//! This crate provides procedural macros to reduce boilerplate when declaring
//! the closed message sets carried by `todomvc_core::EventChannel`.
//!
//! # Available Macros
//!
//! - `#[derive(Message)]` - Implements `todomvc_core::Message` and command/event helpers
//!
//! # Example
//!
//! ```ignore
//! use todomvc_macros::Message;
//!
//! #[derive(Message, Clone, Debug)]
//! enum TodoMessage {
//!     #[command]
//!     AddTodo { title: String },
//!
//!     #[event]
//!     TodoAdded { item: TodoItem },
//! }
//!
//! // Generated methods:
//! assert!(TodoMessage::AddTodo { title: "test".into() }.is_command());
//! assert_eq!(TodoMessage::AddTodo { title: "test".into() }.name(), "add-todo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for message enums
///
/// Generates:
/// - `impl todomvc_core::Message` whose `name()` is the kebab-case variant
///   name (`TodoAdded` becomes `"todo-added"`)
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a request for something to happen
/// - `#[event]` - Mark a variant as a notification that something happened
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
///
/// # Example
///
/// ```ignore
/// #[derive(Message, Clone, Debug)]
/// enum FooterMessage {
///     #[command]
///     ClearCompleted,
///
///     #[event]
///     RemainingUpdated(usize),
/// }
///
/// let message = FooterMessage::RemainingUpdated(3);
/// assert!(message.is_event());
/// assert_eq!(message.name(), "remaining-updated");
/// ```
#[proc_macro_derive(Message, attributes(command, event))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Message)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut name_arms = Vec::new();
    let mut command_arms = Vec::new();
    let mut event_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[command] and #[event]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let message_name = kebab_case(&variant.ident.to_string());

        name_arms.push(quote! { #pattern => #message_name, });
        if is_command {
            command_arms.push(quote! { #pattern => true, });
        }
        if is_event {
            event_arms.push(quote! { #pattern => true, });
        }
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this message is a command
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this message is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#event_arms)*
                    _ => false,
                }
            }
        }

        impl ::todomvc_core::Message for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

fn variant_pattern(variant: &Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// `TodoAdded` -> `todo-added`
fn kebab_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

#[cfg(test)]
mod tests {
    use super::kebab_case;

    #[test]
    fn kebab_case_splits_on_uppercase() {
        assert_eq!(kebab_case("TodoAdded"), "todo-added");
        assert_eq!(kebab_case("ClearCompleted"), "clear-completed");
        assert_eq!(kebab_case("Synced"), "synced");
    }
}
