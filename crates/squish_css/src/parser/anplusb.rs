use crate::parser::CssParser;
use squish_shared::errors::CssResult;

impl CssParser {
    /// The textual `An+B` production of `:nth-*` pseudo-classes:
    /// `[+|-]? [digits]? n [ [+|-] digits ]?`, or plain digits. `even` and
    /// `odd` are handled by the caller. Returns an empty string when the
    /// cursor does not sit on an An+B expression.
    pub fn parse_anplusb_text(&mut self) -> CssResult<String> {
        log::trace!("parse_anplusb_text");

        let mut content = String::new();

        if self.current().is_punctuator('+') {
            self.advance();
        } else if self.current().is_punctuator('-') {
            content.push('-');
            self.advance();
        }

        if self.current().is_number() {
            content.push_str(&self.current().content());
            self.advance();
        }

        // `3n` tokenizes as number + unit `n`; a bare `n` or `-n` is an
        // identifier token
        if self.current().is_unit() || self.current().is_ident() {
            if self.current().has_content("n") || self.current().has_content("-n") {
                content.push_str(&self.current().content());
                self.advance_skip_ws();

                if self.current().is_any_punctuator(&['+', '-']) {
                    content.push_str(&self.current().content());
                    self.advance_skip_ws();

                    if self.current().is_number() {
                        content.push_str(&self.current().content());
                        self.advance();
                    }
                }
            }
        }

        self.skip_whitespace();

        Ok(content)
    }
}
