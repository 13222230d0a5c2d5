mod ast;
mod emit;
mod parse;

/// Declares flag groups and argument specs as plain structs implementing
/// `tflags::Fields`.
#[proc_macro]
pub fn fields(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::parse(_ts) {
            Ok(decls) => emit::emit(&decls),
            Err(err) => format!("compile_error!({:?});", format!("invalid declaration, {err}")),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let decls = parse::parse(ts).unwrap();
    emit::emit(&decls)
}
