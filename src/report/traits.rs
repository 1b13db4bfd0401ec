use super::{BodyKind, DigestReport, RenderedDigest};

pub trait ReportRenderer: Send + Sync {
    fn kind(&self) -> BodyKind;

    fn render_body(&self, report: &DigestReport) -> String;

    fn render(&self, report: &DigestReport) -> RenderedDigest {
        RenderedDigest {
            subject: report.subject(),
            body: self.render_body(report),
            kind: self.kind(),
        }
    }
}
