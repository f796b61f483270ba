use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Pending,
    Active,
    Completed,
}

/// Visual state of a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct WordStyle {
    pub highlight: Highlight,
    /// The word runs into the next one.
    pub linked: bool,
}

impl WordStyle {
    pub fn css_class(&self) -> String {
        let state = match self.highlight {
            Highlight::Pending => "reading-word--pending",
            Highlight::Active => "reading-word--active",
            Highlight::Completed => "reading-word--completed",
        };

        if self.linked {
            format!("reading-word {state} reading-word--linked")
        } else {
            format!("reading-word {state}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn css_classes() {
        let style = WordStyle { highlight: Highlight::Active, linked: false };
        assert_eq!(style.css_class(), "reading-word reading-word--active");

        let style = WordStyle { highlight: Highlight::Completed, linked: true };
        assert_eq!(
            style.css_class(),
            "reading-word reading-word--completed reading-word--linked"
        );
    }
}
