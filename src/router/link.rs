use super::error::LinkError;
use super::{Pattern, Token};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use smallvec::SmallVec;

/// Characters escaped in a wildcard value ending the template; `/` and `.`
/// are kept.
const WILDCARD_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a named placeholder value, and in a wildcard value
/// followed by more template.
const SEGMENT_SET: &AsciiSet = &WILDCARD_SET.add(b'/').add(b'.');

impl Pattern {
    pub(super) fn build_link(
        &self,
        mut values: impl Iterator<Item = String>,
    ) -> Result<String, LinkError> {
        // a wildcard followed by more template cannot keep separators: the
        // lazy match would hand them to whatever comes next
        let rest_set = if ends_with_wildcard(&self.tokens) {
            WILDCARD_SET
        } else {
            SEGMENT_SET
        };

        let mut bound: SmallVec<[String; 8]> = SmallVec::new();

        for (i, name) in self.names.iter().enumerate() {
            let value = match values.next() {
                Some(v) => v,
                None => break,
            };
            if Some(i) == self.wildcard {
                bound.push(utf8_percent_encode(&value, rest_set).to_string());
            } else {
                if value.is_empty() {
                    return Err(LinkError::EmptyValue(format!(":{}", name)));
                }
                bound.push(utf8_percent_encode(&value, SEGMENT_SET).to_string());
            }
        }

        let surplus: SmallVec<[String; 4]> = values
            .map(|v| utf8_percent_encode(&v, rest_set).to_string())
            .collect();
        if !surplus.is_empty() {
            match self.wildcard {
                Some(i) => {
                    let rest = &mut bound[i];
                    for value in surplus {
                        rest.push('/');
                        rest.push_str(&value);
                    }
                }
                None => return Err(LinkError::NoPlaceholder(surplus.join("/"))),
            }
        }

        let mut writer = Writer {
            bound: &bound,
            next: 0,
        };
        let mut link = String::with_capacity(self.source.len());
        if writer.write(&self.tokens, &mut link).complete {
            Ok(link)
        } else {
            Err(LinkError::Incomplete(link))
        }
    }
}

/// Whether the last token of the template, looking into trailing groups,
/// is the wildcard.
fn ends_with_wildcard(tokens: &[Token]) -> bool {
    match tokens.last() {
        Some(Token::Wildcard) => true,
        Some(Token::Group(inner)) => ends_with_wildcard(inner),
        _ => false,
    }
}

struct Writer<'a> {
    bound: &'a [String],
    next: usize,
}

#[derive(Clone, Copy)]
struct Written {
    /// Every placeholder received a value.
    complete: bool,
    /// At least one placeholder received a value.
    bound: bool,
}

impl<'a> Writer<'a> {
    /// Writes `tokens` into `out`.
    ///
    /// A group none of whose placeholders received a value is left out. A
    /// group that received some but not all of its values is kept, so the
    /// link is reported incomplete instead of losing a value.
    fn write(&mut self, tokens: &[Token], out: &mut String) -> Written {
        let mut written = Written {
            complete: true,
            bound: false,
        };
        for token in tokens {
            match token {
                Token::Literal(s) => out.push_str(s),
                Token::Param(name) => match self.take() {
                    Some(v) => {
                        written.bound = true;
                        out.push_str(v);
                    }
                    None => {
                        written.complete = false;
                        out.push(':');
                        out.push_str(name);
                    }
                },
                Token::Wildcard => match self.take() {
                    Some(v) => {
                        written.bound = true;
                        out.push_str(v);
                    }
                    None => {
                        written.complete = false;
                        out.push('*');
                    }
                },
                Token::Group(inner) => {
                    let mut group = String::new();
                    let inner = self.write(inner, &mut group);
                    if inner.complete || inner.bound {
                        out.push_str(&group);
                    }
                    if inner.bound {
                        written.bound = true;
                        written.complete &= inner.complete;
                    }
                }
            }
        }
        written
    }

    fn take(&mut self) -> Option<&'a str> {
        let value = self.bound.get(self.next).map(String::as_str);
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use crate::router::{LinkError, Pattern};

    fn link(template: &str, values: &[&str]) -> Result<String, LinkError> {
        Pattern::compile(template).unwrap().link(values)
    }

    #[test]
    fn substitutes_in_order() {
        assert_eq!(link("/:a/:b", &["x", "y"]).unwrap(), "/x/y");
        assert_eq!(link("/", &[]).unwrap(), "/");
    }

    #[test]
    fn drops_unresolved_groups() {
        let t = "/:controller(/:action(/:id(.:format)))";
        assert_eq!(link(t, &["one"]).unwrap(), "/one");
        assert_eq!(link(t, &["one", "two"]).unwrap(), "/one/two");
        assert_eq!(link(t, &["one", "two", "3"]).unwrap(), "/one/two/3");
        assert_eq!(
            link(t, &["one", "two", "3", "xml"]).unwrap(),
            "/one/two/3.xml"
        );
    }

    #[test]
    fn keeps_literal_groups() {
        assert_eq!(link("/a(/b)", &[]).unwrap(), "/a/b");
    }

    #[test]
    fn surplus_goes_to_wildcard() {
        assert_eq!(link("/a/*", &["x", "y", "z"]).unwrap(), "/a/x/y/z");
        assert_eq!(link("/a(/*)", &[]).unwrap(), "/a");
        assert_eq!(
            link("/a/:b", &["x", "y"]),
            Err(LinkError::NoPlaceholder("y".into()))
        );
    }

    #[test]
    fn incomplete() {
        assert_eq!(
            link("/:a/:b(.:c)", &["x"]),
            Err(LinkError::Incomplete("/x/:b".into()))
        );
        assert_eq!(link("/f/*", &[]), Err(LinkError::Incomplete("/f/*".into())));
    }

    #[test]
    fn keeps_partially_bound_groups() {
        assert_eq!(
            link("/x(/:a/:b)", &["1"]),
            Err(LinkError::Incomplete("/x/1/:b".into()))
        );
        assert_eq!(
            link("/x(/:a(/:b))/:c", &["1"]),
            Err(LinkError::Incomplete("/x/1/:c".into()))
        );
        assert_eq!(link("/x(/:a/:b)", &["1", "2"]).unwrap(), "/x/1/2");
    }

    #[test]
    fn escapes_wildcard_followed_by_template() {
        assert_eq!(link("/files/*(.:format)", &["a.b"]).unwrap(), "/files/a%2Eb");
        assert_eq!(link("/files/*(/:id)", &["a/b"]).unwrap(), "/files/a%2Fb");
        assert_eq!(link("/files(/*)", &["a/b.c"]).unwrap(), "/files/a/b.c");
    }

    #[test]
    fn encodes_values() {
        assert_eq!(link("/:name", &["a b.c"]).unwrap(), "/a%20b%2Ec");
        assert_eq!(link("/files/*", &["a b/c.txt"]).unwrap(), "/files/a%20b/c.txt");
        assert!(matches!(link("/:name", &[""]), Err(LinkError::EmptyValue(_))));
    }
}
