use crate::font::{FIRST_PRINTABLE, LAST_PRINTABLE};

pub(crate) trait StrExt {
    fn first_unprintable(&self) -> Option<(usize, char)>;
}

impl StrExt for str {
    /// The first character (and its position, counted in `char`s) that is neither a newline nor
    /// printable ASCII.
    fn first_unprintable(&self) -> Option<(usize, char)> {
        self.chars()
            .enumerate()
            .find(|&(_, c)| c != '\n' && !(FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&c))
    }
}
