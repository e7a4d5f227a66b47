//! Wrapping drawing routines with an origin translation.
//!
//! [`Translated`] pairs a routine with an offset.  Calling it shifts the
//! surface origin by that offset and then runs the routine, which draws in
//! coordinates relative to the shifted origin.  The shift is never undone:
//! everything drawn afterwards on the same page, including further translated
//! routines, is offset as well.

use log::debug;

use crate::surface::Surface;

/// A drawing routine bound to an origin offset.
#[derive(Clone, Copy, Debug)]
pub struct Translated<F> {
    name: &'static str,
    dx: f64,
    dy: f64,
    routine: F,
}

/// Wraps `routine` so that each call first translates the surface by `(dx, dy)`.
pub fn translated<F>(name: &'static str, dx: f64, dy: f64, routine: F) -> Translated<F> {
    Translated {
        name,
        dx,
        dy,
        routine,
    }
}

impl<F> Translated<F> {
    /// Name of the wrapped routine.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Translates `surface`, then runs the routine with `args` and returns its result.
    pub fn call<S, A, R>(&self, surface: &mut S, args: A) -> R
    where
        S: Surface + ?Sized,
        F: Fn(&mut S, A) -> R,
    {
        surface.translate(self.dx, self.dy);
        debug!(
            "{}: origin translated by ({}, {}) to {:?}",
            self.name,
            self.dx,
            self.dy,
            surface.origin()
        );
        (self.routine)(surface, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::recording::RecordingSurface;

    fn noop(_surface: &mut RecordingSurface, _args: ()) -> Result<()> {
        Ok(())
    }

    #[test]
    fn translations_compose_additively() {
        let mut surface = RecordingSurface::default();
        let first = translated("first", 10.0, 20.0, noop);
        let second = translated("second", 5.0, -3.0, noop);

        first.call(&mut surface, ()).expect("first call");
        second.call(&mut surface, ()).expect("second call");

        assert_eq!(surface.origin(), (15.0, 17.0));
    }

    #[test]
    fn repeated_calls_keep_compounding() {
        let mut surface = RecordingSurface::default();
        let wrapped = translated("repeat", 7.0, 7.0, noop);
        for _ in 0..3 {
            wrapped.call(&mut surface, ()).expect("call");
        }
        assert_eq!(surface.origin(), (21.0, 21.0));
    }

    #[test]
    fn routine_sees_translated_origin_and_result_is_returned() {
        let mut surface = RecordingSurface::default();
        let wrapped = translated("origin", 3.0, 4.0, |surface: &mut RecordingSurface, k: f64| {
            let (x, y) = surface.origin();
            (x + y) * k
        });

        assert_eq!(wrapped.call(&mut surface, 2.0), 14.0);
        assert_eq!(wrapped.name(), "origin");
        assert_eq!(wrapped.offset(), (3.0, 4.0));
    }

    #[test]
    fn errors_pass_through_unchanged() {
        let mut surface = RecordingSurface::default();
        let wrapped = translated("fails", 1.0, 1.0, |surface: &mut RecordingSurface, _: ()| {
            surface.set_font("no-such-font", 10.0)
        });
        let err = wrapped.call(&mut surface, ()).unwrap_err();
        assert!(err.to_string().contains("no-such-font"));
        assert_eq!(surface.origin(), (1.0, 1.0));
    }
}
