use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn, LitStr};

/// Turns a command handler into an entry of the command table.
///
/// The command name is the function name. Next to the function it emits a
/// `<NAME>_COMMAND` constant of type
/// `crate::controller::discord::interaction::CommandDefinition`, which is
/// what both the dispatcher and the registration tool read.
///
/// ```ignore
/// #[command_handler(description = "Checks that the bot is reachable.")]
/// pub fn ping(_data: &CommandData) -> InteractionResponse { ... }
/// ```
#[proc_macro_attribute]
pub fn command_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut description: Option<LitStr> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("description") {
            description = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported command_handler property"))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let input_fn = parse_macro_input!(item as ItemFn);

    let Some(description) = description else {
        return syn::Error::new(
            Span::call_site(),
            "command_handler requires `description = \"...\"`",
        )
        .to_compile_error()
        .into();
    };

    let vis = &input_fn.vis;
    let fn_name = &input_fn.sig.ident;
    let fn_name_str = fn_name.to_string();
    let const_name = format_ident!("{}_COMMAND", fn_name_str.to_uppercase());

    let expanded = quote! {
        #input_fn

        #vis const #const_name: crate::controller::discord::interaction::CommandDefinition =
            crate::controller::discord::interaction::CommandDefinition {
                name: #fn_name_str,
                description: #description,
                handler: #fn_name,
            };
    };

    TokenStream::from(expanded)
}
