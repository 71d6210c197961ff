use std::borrow::Cow;

#[macro_export]
macro_rules! try_match {
    ($e:expr, $(|)? $pattern:pat $( if $guard:expr )? $(,)? => $v:expr) => {
        match $e {
            $pattern $( if $guard )? => Some($v),
            _ => None,
        }
    }
}

/// Produces a copy that no longer borrows from the source buffer.
pub trait CloneStatic<T: 'static> {
    fn clone_static(&self) -> T;
}

impl<T> CloneStatic<Cow<'static, T>> for Cow<'_, T>
where
    T: ToOwned + ?Sized + 'static,
{
    fn clone_static(&self) -> Cow<'static, T> {
        Cow::Owned((**self).to_owned())
    }
}
