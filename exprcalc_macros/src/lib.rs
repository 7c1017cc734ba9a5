use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, ReturnType, Type};

fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Turns a plain numeric function into a whitelist entry.
///
/// ```ignore
/// #[math_fn]
/// fn atan2(y: f64, x: f64) -> f64 {
///     y.atan2(x)
/// }
/// ```
///
/// expands to `fn atan2(args: &[f64]) -> Result<f64, EvaluationError>` which
/// checks the argument count before binding `y` and `x`. Parameters typed
/// `i64` must be integral; `u64` must also be non-negative and below 2^64. A
/// function that returns `f64` has its result wrapped in `Ok`, any other
/// return type is expected to already be `Result<f64, EvaluationError>`.
#[proc_macro_attribute]
pub fn math_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_label = fn_name.to_string();
    let fn_body = &input.block;

    let mut arg_extractions = Vec::new();
    let mut arg_names = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return syn::Error::new_spanned(arg, "math functions cannot take `self`")
                .to_compile_error()
                .into();
        };

        let extract_code = match type_name(ty).as_deref() {
            Some("f64") => quote! {
                let #pat: f64 = args[#i];
            },
            Some("i64") => quote! {
                let #pat: i64 = {
                    let value = args[#i];
                    if !value.is_finite() || value.fract() != 0.0 {
                        return Err(crate::error::EvaluationError::NotIntegral {
                            function: #fn_label,
                            value,
                        });
                    }
                    value as i64
                };
            },
            Some("u64") => quote! {
                let #pat: u64 = {
                    let value = args[#i];
                    if !value.is_finite() || value.fract() != 0.0 {
                        return Err(crate::error::EvaluationError::NotIntegral {
                            function: #fn_label,
                            value,
                        });
                    }
                    if value < 0.0 {
                        return Err(crate::error::EvaluationError::Domain {
                            function: #fn_label,
                            reason: "not defined for negative values".to_string(),
                        });
                    }
                    if value >= 18_446_744_073_709_551_616.0 {
                        return Err(crate::error::EvaluationError::Domain {
                            function: #fn_label,
                            reason: "argument too large".to_string(),
                        });
                    }
                    value as u64
                };
            },
            _ => {
                return syn::Error::new_spanned(ty, "expected f64, i64 or u64")
                    .to_compile_error()
                    .into();
            }
        };

        arg_extractions.push(extract_code);
        arg_names.push(pat);
    }

    let returns_plain_f64 = match &input.sig.output {
        ReturnType::Type(_, ty) => type_name(ty).as_deref() == Some("f64"),
        ReturnType::Default => false,
    };

    // The original body stays a function of its own so `return` inside it
    // keeps its meaning.
    let inputs = &input.sig.inputs;
    let output = &input.sig.output;
    let call = quote! { body(#(#arg_names),*) };
    let result = if returns_plain_f64 {
        quote! { Ok(#call) }
    } else {
        call
    };

    let args_len = arg_extractions.len();
    let expanded = quote! {
        #(#attrs)*
        #vis fn #fn_name(args: &[f64]) -> ::std::result::Result<f64, crate::error::EvaluationError> {
            fn body(#inputs) #output #fn_body

            if args.len() != #args_len {
                return Err(crate::error::EvaluationError::Arity {
                    function: #fn_label,
                    expected: crate::error::Arity::Exactly(#args_len),
                    found: args.len(),
                });
            }

            #(#arg_extractions)*

            #result
        }
    };

    TokenStream::from(expanded)
}
