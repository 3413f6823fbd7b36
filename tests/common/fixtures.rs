//! Porcelain output fixtures

/// `ruyi --porcelain list` with the single gcc toolchain
pub const GCC_CATALOG: &str = r#"{"ty":"pkg","category":"toolchain","name":"gcc","vers":[{"semver":"1.0.0","pm":{"format":"v1","toolchain":{"target":"riscv64"}},"remarks":[]}]}"#;

/// `ruyi --porcelain list` with a realistic mix of categories
pub const CATALOG: &str = r#"{"ty":"pkglistoutput-v1","category":"toolchain","name":"gnu-plct","vers":[{"semver":"0.20240324.0","pm":{"format":"v1","toolchain":{"target":"riscv64-plct-linux-gnu","included_sysroot":"riscv64-plct-linux-gnu/sysroot"}},"remarks":["latest"]}]}
{"ty":"pkglistoutput-v1","category":"toolchain","name":"llvm-upstream","vers":[{"semver":"17.0.5","pm":{"format":"v1","toolchain":{"target":"riscv64-unknown-linux-gnu"}},"remarks":[]}]}
{"ty":"pkglistoutput-v1","category":"source","name":"milkv-duo-examples","vers":[{"semver":"0.1.0","pm":{"format":"v1"},"remarks":[]}]}
{"ty":"pkglistoutput-v1","category":"emulator","name":"qemu-user-riscv-upstream","vers":[{"semver":"8.2.0","pm":{"format":"v1"},"remarks":[]}]}
{"ty":"pkglistoutput-v1","category":"analyzer","name":"dynamorio","vers":[]}"#;

/// `ruyi --porcelain list profiles`
pub const PROFILES: &str = "generic (baseline)
milkv-duo
sipeed-lpi4a (needs quirks: {'xthead'})";

/// `ruyi --porcelain news list`
pub const NEWS: &str = r#"{"ty":"newsitem-v1","id":"2024-01-14-ruyi-news","ord":1,"is_read":true,"langs":[{"lang":"en_US","display_title":"Welcome to RuyiSDK","content":"Hello"},{"lang":"zh_CN","display_title":"欢迎","content":"你好"}]}
{"ty":"newsitem-v1","id":"2024-03-20-ruyi-0.7","ord":2,"is_read":false,"langs":[{"lang":"en_US","display_title":"ruyi 0.7.0","content":"Changes"}]}"#;
