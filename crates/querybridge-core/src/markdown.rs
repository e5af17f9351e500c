pub fn header(level: usize, text: &str) -> String {
    let level = level.max(1);
    format!("{} {}", "#".repeat(level), text)
}

pub fn bold(label: &str, value: &str) -> String {
    format!("**{}:** {}", label, value)
}

pub fn code_block(language: &str, body: &str) -> String {
    format!("```{language}\n{body}\n```")
}
