use std::fmt::Write;

use crate::ast;

pub(crate) fn emit(decls: &ast::Decls) -> String {
    let mut buf = String::new();
    for item in &decls.items {
        emit_struct(&mut buf, item);
        blank_line(&mut buf);
        emit_impl(&mut buf, item);
        blank_line(&mut buf);
    }
    buf
}

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

fn emit_struct(buf: &mut String, item: &ast::Item) {
    emit_doc_attrs(buf, &item.doc);
    w!(buf, "#[derive(Debug, Default, Clone, PartialEq)]\n");
    w!(buf, "pub struct {}", item.ident());
    if item.flags.is_empty() && item.args.is_empty() {
        w!(buf, ";\n");
        return;
    }
    w!(buf, " {{\n");

    for flag in &item.flags {
        emit_doc_attrs(buf, &flag.doc);
        let ty = match &flag.val {
            None => "bool".to_string(),
            Some(val) => format!("Option<{}>", rust_ty(val.ty)),
        };
        w!(buf, "    pub {}: {},\n", flag.ident(), ty);
    }

    for arg in &item.args {
        emit_doc_attrs(buf, &arg.doc);
        let ty = match arg.arity {
            ast::Arity::Required => rust_ty(arg.val.ty).to_string(),
            ast::Arity::Repeated | ast::Arity::RequiredRepeated => "Vec<String>".to_string(),
        };
        w!(buf, "    pub {}: {},\n", arg.val.ident(), ty);
    }
    w!(buf, "}}\n");
}

fn emit_impl(buf: &mut String, item: &ast::Item) {
    w!(buf, "impl tflags::Fields for {} {{\n", item.ident());

    w!(buf, "    fn fields() -> Vec<tflags::Field> {{\n");
    w!(buf, "        vec![\n");
    for flag in &item.flags {
        let kind = flag.val.as_ref().map_or("Bool", |it| kind_of(it.ty));
        w!(buf, "            tflags::Field::new(\"{}\", tflags::Kind::{})", flag.ident(), kind);
        if let Some(short) = &flag.short {
            w!(buf, ".short(\"{}\")", short);
        }
        w!(buf, ".long(\"{}\")", flag.name);
        emit_doc_call(buf, &flag.doc);
        w!(buf, ",\n");
    }
    for arg in &item.args {
        let kind = match arg.arity {
            ast::Arity::Required => kind_of(arg.val.ty),
            ast::Arity::Repeated | ast::Arity::RequiredRepeated => "StrSeq",
        };
        w!(buf, "            tflags::Field::new(\"{}\", tflags::Kind::{})", arg.val.ident(), kind);
        if arg.arity == ast::Arity::Repeated {
            w!(buf, ".allow_empty()");
        }
        emit_doc_call(buf, &arg.doc);
        w!(buf, ",\n");
    }
    w!(buf, "        ]\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    if item.flags.is_empty() && item.args.is_empty() {
        w!(buf, "    fn from_values(_values: tflags::Values) -> Self {{\n");
        w!(buf, "        {}\n", item.ident());
        w!(buf, "    }}\n");
        w!(buf, "}}\n");
        return;
    }

    w!(buf, "    fn from_values(mut values_: tflags::Values) -> Self {{\n");
    w!(buf, "        {} {{\n", item.ident());
    let mut idx = 0;
    for flag in &item.flags {
        let take = match &flag.val {
            None => format!("values_.take_bool({idx})"),
            Some(val) => format!("values_.{}({idx})", take_fn(val.ty)),
        };
        w!(buf, "            {}: {},\n", flag.ident(), take);
        idx += 1;
    }
    for arg in &item.args {
        let take = match arg.arity {
            ast::Arity::Required => {
                format!("values_.{}({idx}).unwrap_or_default()", take_fn(arg.val.ty))
            }
            ast::Arity::Repeated | ast::Arity::RequiredRepeated => {
                format!("values_.take_seq({idx})")
            }
        };
        w!(buf, "            {}: {},\n", arg.val.ident(), take);
        idx += 1;
    }
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn emit_doc_attrs(buf: &mut String, doc: &ast::Doc) {
    for line in &doc.lines {
        w!(buf, "#[doc = {}]\n", line);
    }
}

fn emit_doc_call(buf: &mut String, doc: &ast::Doc) {
    match doc.lines.as_slice() {
        [] => (),
        [line] => w!(buf, ".doc({})", line),
        lines => w!(buf, ".doc(concat!({}))", lines.join(", \"\\n\", ")),
    }
}

fn rust_ty(ty: ast::Ty) -> &'static str {
    match ty {
        ast::Ty::String => "String",
        ast::Ty::I64 => "i64",
        ast::Ty::U64 => "u64",
        ast::Ty::F64 => "f64",
    }
}

fn kind_of(ty: ast::Ty) -> &'static str {
    match ty {
        ast::Ty::String => "Str",
        ast::Ty::I64 => "Int",
        ast::Ty::U64 => "Uint",
        ast::Ty::F64 => "Float",
    }
}

fn take_fn(ty: ast::Ty) -> &'static str {
    match ty {
        ast::Ty::String => "take_str",
        ast::Ty::I64 => "take_int",
        ast::Ty::U64 => "take_uint",
        ast::Ty::F64 => "take_float",
    }
}

impl ast::Item {
    fn ident(&self) -> String {
        camel(&self.name)
    }
}

impl ast::Flag {
    fn ident(&self) -> String {
        snake(&self.name)
    }
}

impl ast::Val {
    fn ident(&self) -> String {
        snake(&self.name)
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}

fn camel(s: &str) -> String {
    s.split('-').map(first_upper).collect()
}

fn first_upper(s: &str) -> String {
    s.chars()
        .next()
        .map(|it| it.to_ascii_uppercase())
        .into_iter()
        .chain(s.chars().skip(1))
        .collect()
}

fn snake(s: &str) -> String {
    s.replace('-', "_")
}
