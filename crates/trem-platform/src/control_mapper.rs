//! Fixed-capacity control → parameter routing.
//!
//! [`ControlMapper`] associates [`ControlId`]s with parameter indices of
//! anything implementing [`ParameterInfo`]. The control loop uses it to
//! route MIDI CC numbers onto [`Settings`](crate::Settings) parameters;
//! normalized controller values go through the parameter's descriptor, so
//! stepped parameters snap and tapered ones follow their curve.

use crate::{ControlId, ParameterInfo};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Route {
    control_id: ControlId,
    param_index: usize,
}

/// Maps controls to parameter indices.
///
/// `N` is the capacity; the table never allocates.
///
/// # Example
///
/// ```rust
/// use trem_platform::{ControlId, ControlMapper};
///
/// let mut mapper = ControlMapper::<4>::new();
/// assert!(mapper.map(ControlId::midi(20), 1));
/// assert!(mapper.map(ControlId::midi(21), 2));
///
/// assert_eq!(mapper.get_param_index(ControlId::midi(20)), Some(1));
/// assert_eq!(mapper.get_param_index(ControlId::midi(21)), Some(2));
/// assert_eq!(mapper.get_param_index(ControlId::midi(22)), None);
/// ```
#[derive(Debug, Clone)]
pub struct ControlMapper<const N: usize> {
    routes: [Option<Route>; N],
}

impl<const N: usize> ControlMapper<N> {
    /// Creates an empty mapper.
    pub const fn new() -> Self {
        Self { routes: [None; N] }
    }

    /// Route `control_id` to `param_index`, replacing an existing route for
    /// the same control.
    ///
    /// Returns `false` if the table is full.
    pub fn map(&mut self, control_id: ControlId, param_index: usize) -> bool {
        if let Some(route) = self
            .routes
            .iter_mut()
            .flatten()
            .find(|r| r.control_id == control_id)
        {
            route.param_index = param_index;
            return true;
        }

        match self.routes.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(Route {
                    control_id,
                    param_index,
                });
                true
            }
            None => false,
        }
    }

    /// Parameter index routed from a control.
    #[inline]
    pub fn get_param_index(&self, control_id: ControlId) -> Option<usize> {
        self.routes
            .iter()
            .flatten()
            .find(|r| r.control_id == control_id)
            .map(|r| r.param_index)
    }

    /// Iterate over `(control, parameter index)` routes.
    pub fn routes(&self) -> impl Iterator<Item = (ControlId, usize)> + '_ {
        self.routes
            .iter()
            .flatten()
            .map(|r| (r.control_id, r.param_index))
    }

    /// Set the routed parameter from a normalized control value.
    ///
    /// Returns `false` if the control is unmapped or the parameter missing.
    pub fn apply<P: ParameterInfo + ?Sized>(
        &self,
        control_id: ControlId,
        normalized_value: f32,
        target: &mut P,
    ) -> bool {
        match self.get_param_index(control_id) {
            Some(index) => target.set_param_normalized(index, normalized_value),
            None => false,
        }
    }
}

impl<const N: usize> Default for ControlMapper<N> {
    fn default() -> Self {
        Self::new()
    }
}
