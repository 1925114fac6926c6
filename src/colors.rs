/// ANSI color codes for previewing projected lines in a terminal
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub prefix: &'static str, // Gray for the free-text prefix
    pub key: &'static str,    // Cyan for field names
    pub equals: &'static str, // White for = separator
    pub value: &'static str,  // Green for values
    pub reset: &'static str,  // Reset to default color
}

impl ColorScheme {
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                prefix: "\x1b[90m",
                key: "\x1b[36m",
                equals: "\x1b[37m",
                value: "\x1b[32m",
                reset: "\x1b[0m",
            }
        } else {
            // All empty strings for no-color mode
            Self {
                prefix: "",
                key: "",
                equals: "",
                value: "",
                reset: "",
            }
        }
    }

    pub fn is_plain(&self) -> bool {
        self.reset.is_empty()
    }

    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }
}
