use std::env;

fn main() {
    // Version string shared by `--version` and the HTTP user agent
    let version = env::var("IMGFETCH_VERSION_OVERRIDE")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=IMGFETCH_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=IMGFETCH_VERSION_OVERRIDE");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
