/// Ordered filter arguments, positional or `key=value`
///
/// Rendered as `name=a:b:key=value`, or just `name` when empty. Setting a
/// named argument twice replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    entries: Vec<(Option<String>, String)>,
}

impl FilterArgs {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.entries.push((None, value.to_string()));
        self
    }

    /// Set a named argument; an all-digit key is taken as positional
    pub fn named(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();

        if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
            self.entries.push((None, value));
            return self;
        }

        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.as_deref() == Some(key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((Some(key.to_string()), value)),
        }

        self
    }

    /// Value of a named argument
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a named argument is set
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overlay `other`: named values replace ours in place, positional ones are appended
    pub fn merge(mut self, other: FilterArgs) -> Self {
        for (key, value) in other.entries {
            self = match key {
                Some(key) => self.named(&key, value),
                None => self.arg(value),
            };
        }
        self
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter expression for `name`
    pub fn render(&self, name: &str) -> String {
        if self.entries.is_empty() {
            return name.to_string();
        }

        let args: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| match key {
                Some(key) => format!("{}={}", key, value),
                None => value.clone(),
            })
            .collect();

        format!("{}={}", name, args.join(":"))
    }
}
