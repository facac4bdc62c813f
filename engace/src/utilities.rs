use std::io::{self, Write};



pub fn input(prompt: &str) -> io::Result<String> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

/// Reads lines until one holding a single `.` (or end of input).
pub fn input_multiline(prompt: &str) -> io::Result<String> {
    println!("{prompt} (finish with a line containing only '.')");
    let mut lines = Vec::new();
    loop {
        let line = input("")?;
        if line.is_empty() || line.trim_end_matches(['\r', '\n']) == "." {
            break;
        }
        lines.push(line.trim_end_matches(['\r', '\n']).to_string());
    }
    Ok(lines.join("\n"))
}

pub fn str_to_bool(mut str: String) -> Option<bool> {
    str.make_ascii_lowercase();
    match str.trim() {
        "y" | "yes" | "yeah" | "yea" | "true" | "on" => Some(true),
        "n" | "no" | "nope" | "false" | "off" => Some(false),
        _ => None,
    }
}

pub fn confirm(prompt: &str) -> io::Result<bool> {
    Ok(str_to_bool(input(prompt)?).unwrap_or(false))
}

/// Indents every line of `text` by `width` spaces.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
