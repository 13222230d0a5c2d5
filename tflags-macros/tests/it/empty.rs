tflags::fields! {
    flags Empty {}
    args Nothing {}
}
