// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
           _               _ _   _
 ___ _   _| |__  _ __ ___ (_) |_| |_ _   _
/ __| | | | '_ \| '_ ` _ \| | __| __| | | |
\__ \ |_| | |_) | | | | | | | |_| |_| |_| |
|___/\__,_|_.__/|_| |_| |_|_|\__|\__|\__, |
                                     |___/

    Student API Conformance Checks
"#;
    println!("{}", banner);
}
