//! Title screen printed once at startup.

use std::io::{self, Write};

use mercator_types::style;

const LOGO: &[&str] = &[
    r#"                                                        888                   "#,
    r#"                                                        888                   "#,
    r#"                                                        888                   "#,
    r#"        88888b.d88b.   .d88b.  888d888 .d8888b  8888b.  888888 .d88b.  888d888"#,
    r#"        888 "888 "88b d8P  Y8b 888P"  d88P"        "88b 888   d88""88b 888P"  "#,
    r#"        888  888  888 88888888 888    888      .d888888 888   888  888 888    "#,
    r#"        888  888  888 Y8b.     888    Y88b.    888  888 Y88b. Y88..88P 888    "#,
    r#"        888  888  888  "Y8888  888     "Y8888P "Y888888  "Y888 "Y88P"  888    "#,
];

const TAGLINE: &str = "                      a personal CLI for financial things";
const BYLINE: &str = "                                by @eliquious";

pub fn print<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    for line in LOGO {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", style::dim(TAGLINE))?;
    writeln!(out, "{}", style::good(BYLINE))?;
    writeln!(out)
}
