use crate::coords::{Transform, Vec2};

/// A single recorded path command, in frame units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    /// Cubic Bézier: two control points, then the end point.
    BezierTo(Vec2, Vec2, Vec2),
    Close,
}

/// Immutable command list; what `fill` / `stroke` read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of subpaths started (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }
}

/// Accumulates the current path.
///
/// Every method taking a point also takes the transform to apply to it; the
/// builder itself never holds transform state. `line_to` / curve commands
/// without an active subpath are ignored.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    path: Path,
    /// Last point of the active (open) subpath, in frame units.
    pen: Option<Vec2>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current path. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.path.commands.clear();
        self.pen = None;
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn has_active_subpath(&self) -> bool {
        self.pen.is_some()
    }

    /// Current pen position in frame units, if a subpath is active.
    #[inline]
    pub fn pen(&self) -> Option<Vec2> {
        self.pen
    }

    /// Starts a new open subpath at `p`.
    pub fn move_to(&mut self, xf: &Transform, p: Vec2) {
        let p = xf.apply(p);
        self.path.commands.push(PathCommand::MoveTo(p));
        self.pen = Some(p);
    }

    pub fn line_to(&mut self, xf: &Transform, p: Vec2) {
        if self.pen.is_none() {
            log::trace!("line_to without an active subpath ignored");
            return;
        }
        let p = xf.apply(p);
        self.path.commands.push(PathCommand::LineTo(p));
        self.pen = Some(p);
    }

    pub fn bezier_to(&mut self, xf: &Transform, c1: Vec2, c2: Vec2, p: Vec2) {
        if self.pen.is_none() {
            log::trace!("bezier_to without an active subpath ignored");
            return;
        }
        let p = xf.apply(p);
        self.path
            .commands
            .push(PathCommand::BezierTo(xf.apply(c1), xf.apply(c2), p));
        self.pen = Some(p);
    }

    /// Quadratic Bézier, stored as the equivalent cubic.
    ///
    /// Degree elevation commutes with affine maps, so it is done in frame units.
    pub fn quad_to(&mut self, xf: &Transform, c: Vec2, p: Vec2) {
        let Some(p0) = self.pen else {
            log::trace!("quad_to without an active subpath ignored");
            return;
        };
        let c = xf.apply(c);
        let p = xf.apply(p);
        let c1 = p0 + (c - p0) * (2.0 / 3.0);
        let c2 = p + (c - p) * (2.0 / 3.0);
        self.path.commands.push(PathCommand::BezierTo(c1, c2, p));
        self.pen = Some(p);
    }

    /// Marks the active subpath closed and ends it.
    pub fn close(&mut self) {
        if self.pen.take().is_some() {
            self.path.commands.push(PathCommand::Close);
        }
    }

    /// Pushes an already-transformed command. Used by the shape helpers.
    pub(crate) fn push_raw(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) | PathCommand::BezierTo(_, _, p) => {
                self.pen = Some(p)
            }
            PathCommand::Close => self.pen = None,
        }
        self.path.commands.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: Transform = Transform::IDENTITY;

    #[test]
    fn line_to_without_move_is_ignored() {
        let mut b = PathBuilder::new();
        b.line_to(&ID, Vec2::new(1.0, 1.0));
        b.bezier_to(&ID, Vec2::zero(), Vec2::zero(), Vec2::new(1.0, 0.0));
        assert!(b.path().is_empty());
    }

    #[test]
    fn points_use_transform_at_declaration() {
        let mut b = PathBuilder::new();
        b.move_to(&Transform::translation(10.0, 0.0), Vec2::new(1.0, 1.0));
        b.line_to(&Transform::scaling(2.0, 2.0), Vec2::new(1.0, 1.0));
        assert_eq!(
            b.path().commands(),
            &[
                PathCommand::MoveTo(Vec2::new(11.0, 1.0)),
                PathCommand::LineTo(Vec2::new(2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn close_ends_active_subpath() {
        let mut b = PathBuilder::new();
        b.move_to(&ID, Vec2::zero());
        b.line_to(&ID, Vec2::new(1.0, 0.0));
        b.close();
        b.line_to(&ID, Vec2::new(5.0, 5.0));
        assert_eq!(b.path().commands().len(), 3);
        assert!(!b.has_active_subpath());
    }

    #[test]
    fn quad_to_elevates_to_cubic() {
        let mut b = PathBuilder::new();
        b.move_to(&ID, Vec2::new(0.0, 0.0));
        b.quad_to(&ID, Vec2::new(3.0, 3.0), Vec2::new(6.0, 0.0));
        let PathCommand::BezierTo(c1, c2, p) = b.path().commands()[1] else {
            panic!("expected a cubic");
        };
        assert!(c1.approx_eq(Vec2::new(2.0, 2.0), 1e-5));
        assert!(c2.approx_eq(Vec2::new(4.0, 2.0), 1e-5));
        assert_eq!(p, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn clear_discards_everything() {
        let mut b = PathBuilder::new();
        b.move_to(&ID, Vec2::zero());
        b.clear();
        assert!(b.path().is_empty());
        assert_eq!(b.path().subpath_count(), 0);
        assert!(b.pen().is_none());
    }
}
