#[derive(Debug)]
pub(crate) struct Decls {
    pub(crate) items: Vec<Item>,
}

#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) name: String,
    pub(crate) doc: Doc,
    pub(crate) flags: Vec<Flag>,
    pub(crate) args: Vec<Arg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemKind {
    Flags,
    Args,
}

/// Doc comment lines, kept as the string literals the compiler gave us.
#[derive(Debug, Default)]
pub(crate) struct Doc {
    pub(crate) lines: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct Flag {
    pub(crate) name: String,
    pub(crate) short: Option<String>,
    pub(crate) doc: Doc,
    pub(crate) val: Option<Val>,
}

#[derive(Debug)]
pub(crate) struct Arg {
    pub(crate) arity: Arity,
    pub(crate) doc: Doc,
    pub(crate) val: Val,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    Required,
    /// Zero or more trailing values.
    Repeated,
    /// One or more trailing values.
    RequiredRepeated,
}

#[derive(Debug)]
pub(crate) struct Val {
    pub(crate) name: String,
    pub(crate) ty: Ty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ty {
    String,
    I64,
    U64,
    F64,
}
