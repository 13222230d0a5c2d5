tflags::fields! {
    /// Program-wide flags.
    flags Global {
        /// Show debugging information
        optional -d, --debug
        /// Disable coloring of output text
        optional -N, --no-color
        optional -y, --yes-all
        optional -v, --verbose
    }

    flags Build {
        /// Number of parallel jobs.
        optional -j, --jobs n: u64
        optional -o, --out-dir path: String
        optional --opt-level level: i64
        optional --ratio r: f64
    }

    args BuildArgs {
        required target: String
        /// How many times to build.
        required times: u64
    }
}
