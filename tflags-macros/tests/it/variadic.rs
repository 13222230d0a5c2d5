tflags::fields! {
    flags ExampleFlags {
        /// You saw nothing
        optional -b, --boop
        optional --bop
    }

    /// Slice of arguments, possibly empty.
    args ExampleArgs {
        repeated args: String
    }

    args Files {
        required first: String
        required repeated files: String
    }
}
