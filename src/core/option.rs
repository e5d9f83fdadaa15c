/// Option recorded on a stream, rendered at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOption {
    /// Option flag, e.g. `-b`
    pub name: String,
    /// Argument following the flag, skipped when empty
    pub argument: String,
    /// Whether the flag receives the `:<type>:<index>` stream specifier
    pub per_stream: bool,
}

impl StreamOption {
    /// Render the option tokens for the given stream specifier
    pub fn render(&self, specifier: &str, tokens: &mut Vec<String>) {
        let name = if self.per_stream {
            format!("{}:{}", self.name, specifier)
        } else {
            self.name.clone()
        };
        push_option(tokens, &name, &self.argument);
    }
}

/// Stream label, either fixed or resolved from the stream position on first read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamName {
    /// Not read yet; resolved from the current sibling position
    Pending,
    /// Fixed label
    Resolved(String),
}

/// Append an option flag and its argument, skipping an empty argument
pub fn push_option(tokens: &mut Vec<String>, name: &str, argument: &str) {
    tokens.push(name.to_string());

    if !argument.is_empty() {
        tokens.push(argument.to_string());
    }
}

/// Join label parts with `:`, trimming colons left over from empty parts
pub fn join_label(parts: &[&str]) -> String {
    parts.join(":").trim_matches(':').to_string()
}

/// Shell-escaped, space-joined rendering of an argument vector
///
/// For display and logging only; pass the vector itself to the process.
pub fn shell_join(tokens: &[String]) -> String {
    shell_words::join(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_per_stream_option() {
        let option = StreamOption {
            name: "-b".to_string(),
            argument: "64k".to_string(),
            per_stream: true,
        };
        let mut tokens = Vec::new();
        option.render("a:1", &mut tokens);
        assert_eq!(tokens, vec!["-b:a:1", "64k"]);
    }

    #[test]
    fn test_render_flag_without_argument() {
        let option = StreamOption {
            name: "-vn".to_string(),
            argument: String::new(),
            per_stream: false,
        };
        let mut tokens = Vec::new();
        option.render("v:0", &mut tokens);
        assert_eq!(tokens, vec!["-vn"]);
    }

    #[test]
    fn test_join_label_trims_empty_file_name() {
        assert_eq!(join_label(&["", "v", "0"]), "v:0");
        assert_eq!(join_label(&["1", "a", "2"]), "1:a:2");
        assert_eq!(join_label(&["", "v", ""]), "v");
    }

    #[test]
    fn test_shell_join_quotes_when_needed() {
        let tokens = vec![
            "-filter_complex".to_string(),
            "[0:v:0] trim=1:2 [v_0]".to_string(),
        ];
        assert_eq!(
            shell_join(&tokens),
            "-filter_complex '[0:v:0] trim=1:2 [v_0]'"
        );
    }
}
