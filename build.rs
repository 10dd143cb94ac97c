// build.rs

fn main() {
    // The viewer only needs Xlib itself; labels are drawn by the built-in
    // bitmap font, so no Xft/fontconfig linkage is required.
    if pkg_config::probe_library("x11").is_err() {
        // Manual fallback for systems without a usable pkg-config. Assumes
        // the X11 development library sits in a standard search path.
        eprintln!("pkg-config failed for 'x11'. Falling back to manual linking.");
        println!("cargo:rustc-link-lib=X11");
        println!("cargo:rustc-link-search=/usr/lib");
    }
}
