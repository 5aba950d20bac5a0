use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::ShotframeResult;
use crate::style::scene::SceneStyle;

/// Shared, single-threaded handle to the live [`SceneStyle`].
///
/// The configuration surface writes through [`StyleHandle::update`]; render loops only call
/// [`StyleHandle::snapshot`] at tick start, so a tick never observes a half-applied edit.
#[derive(Clone, Debug, Default)]
pub struct StyleHandle(Rc<RefCell<SceneStyle>>);

impl StyleHandle {
    /// Wrap an initial style.
    pub fn new(style: SceneStyle) -> Self {
        Self(Rc::new(RefCell::new(style)))
    }

    /// Copy of the current style.
    pub fn snapshot(&self) -> SceneStyle {
        *self.0.borrow()
    }

    /// Apply an edit; the edit is discarded when the result fails validation.
    pub fn update(&self, edit: impl FnOnce(&mut SceneStyle)) -> ShotframeResult<()> {
        let mut next = self.snapshot();
        edit(&mut next);
        next.validate()?;
        *self.0.borrow_mut() = next;
        Ok(())
    }

    /// Replace the whole style after validating it.
    pub fn replace(&self, style: SceneStyle) -> ShotframeResult<()> {
        self.update(|s| *s = style)
    }
}
