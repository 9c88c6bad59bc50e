// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
     _                   _
  __| | ___   __ _ _ __ (_) ___
 / _` |/ _ \ / _` | '_ \| |/ __|
| (_| | (_) | (_| | |_) | | (__
 \__,_|\___/ \__, | .__/|_|\___|
             |___/|_|

    Random dog pictures, proxied
"#;
    println!("{}", banner);
}
