use anyhow::{bail, Result};

use crate::tree::Span;

/// Downstream text-rewriting service. Passes request edits through this
/// trait and never touch raw source bytes. An `Err` from either method
/// aborts the pass; already-requested edits are not rolled back, so the
/// caller must discard the output of a failed run.
pub trait Rewriter {
    fn replace_param_decl(&mut self, site: Span, new_name: &str) -> Result<()>;

    fn replace_param_ref(&mut self, site: Span, new_name: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    ParamDecl,
    ParamRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    pub site: Span,
    pub text: String,
}

/// Rewriter that records requested edits without applying them. Used by
/// callers that batch edits for an external service, and by tests.
#[derive(Debug, Default)]
pub struct EditLog {
    pub edits: Vec<Edit>,
}

impl Rewriter for EditLog {
    fn replace_param_decl(&mut self, site: Span, new_name: &str) -> Result<()> {
        self.edits.push(Edit {
            kind: EditKind::ParamDecl,
            site,
            text: new_name.to_string(),
        });
        Ok(())
    }

    fn replace_param_ref(&mut self, site: Span, new_name: &str) -> Result<()> {
        self.edits.push(Edit {
            kind: EditKind::ParamRef,
            site,
            text: new_name.to_string(),
        });
        Ok(())
    }
}

/// Rewriter that applies byte-span replacements to an in-memory source
/// buffer. Edits are queued during the pass and materialized once by
/// `into_output`, back to front so earlier spans stay valid.
#[derive(Debug)]
pub struct SourceRewriter {
    source: String,
    pending: Vec<(Span, String)>,
}

impl SourceRewriter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pending: Vec::new(),
        }
    }

    fn queue(&mut self, site: Span, text: &str) -> Result<()> {
        if site.start > site.end || site.end > self.source.len() {
            bail!(
                "edit site {}..{} out of range for {} source bytes",
                site.start,
                site.end,
                self.source.len()
            );
        }
        self.pending.push((site, text.to_string()));
        Ok(())
    }

    pub fn into_output(mut self) -> Result<String> {
        self.pending.sort_by_key(|(site, _)| (site.start, site.end));
        for pair in self.pending.windows(2) {
            let (a, _) = &pair[0];
            let (b, _) = &pair[1];
            if a.end > b.start {
                bail!(
                    "overlapping edits: {}..{} collides with {}..{}",
                    a.start,
                    a.end,
                    b.start,
                    b.end
                );
            }
        }
        let mut out = self.source;
        for (site, text) in self.pending.into_iter().rev() {
            out.replace_range(site.start..site.end, &text);
        }
        Ok(out)
    }
}

impl Rewriter for SourceRewriter {
    fn replace_param_decl(&mut self, site: Span, new_name: &str) -> Result<()> {
        self.queue(site, new_name)
    }

    fn replace_param_ref(&mut self, site: Span, new_name: &str) -> Result<()> {
        self.queue(site, new_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rewriter, SourceRewriter};
    use crate::tree::Span;

    #[test]
    fn source_rewriter_applies_spans_in_any_request_order() {
        let mut rw = SourceRewriter::new("int f(int alpha, int beta);");
        rw.replace_param_decl(Span::new(21, 25), "p2").expect("beta edit");
        rw.replace_param_decl(Span::new(10, 15), "p1").expect("alpha edit");
        let out = rw.into_output().expect("apply");
        assert_eq!(out, "int f(int p1, int p2);");
    }

    #[test]
    fn source_rewriter_rejects_out_of_range_edit() {
        let mut rw = SourceRewriter::new("short");
        let err = rw
            .replace_param_ref(Span::new(2, 9), "x")
            .expect_err("span past end of buffer must be rejected");
        assert!(err.to_string().contains("out of range"), "got: {err}");
    }

    #[test]
    fn source_rewriter_rejects_overlapping_edits() {
        let mut rw = SourceRewriter::new("abcdef");
        rw.replace_param_ref(Span::new(1, 4), "x").expect("first edit");
        rw.replace_param_ref(Span::new(3, 5), "y").expect("second edit");
        let err = rw.into_output().expect_err("overlap must be rejected");
        assert!(err.to_string().contains("overlapping"), "got: {err}");
    }
}
