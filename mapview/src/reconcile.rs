//! Bringing the engine in line with a new revision of [`MapProps`].

use std::rc::Rc;

use crate::{
    Error, Layer, MapHandle, MapProps, View as _,
    options::{AnimationOptions, same_layers},
};

/// Single check of the reconciliation pipeline, together with the engine mutation it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// New animation options: start an animated transition.
    Animate,
    /// New layer list: clear the map and initialize every layer again.
    ReplaceLayers,
    /// New center: jump there, no animation.
    Center,
    /// New extent: fit the view using [`MapProps::fit_options`].
    Fit,
    Zoom,
    /// New resolution, unless the view already has it.
    Resolution,
}

/// Steps in the order they are checked and applied. Each one is independent of the others,
/// but layers must be in place before the view geometry changes, so that fitting sees the
/// final data.
///
/// An animation does not stop the direct mutations that follow. Changing e.g. both the
/// animation and the center in one revision starts the transition and immediately overrides
/// it with a jump.
pub const PIPELINE: [Step; 6] = [
    Step::Animate,
    Step::ReplaceLayers,
    Step::Center,
    Step::Fit,
    Step::Zoom,
    Step::Resolution,
];

/// Steps applied by a single [`crate::MapView::update`], in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    applied: Vec<Step>,
}

impl Reconciliation {
    pub fn applied(&self) -> &[Step] {
        &self.applied
    }

    pub fn contains(&self, step: Step) -> bool {
        self.applied.contains(&step)
    }

    /// Nothing had to change.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Run the whole [`PIPELINE`]. Each step is checked right before it is applied, so it sees
/// the engine state left by the previous ones. Stops at the first error.
pub(crate) fn reconcile<M: MapHandle>(
    previous: &MapProps<M>,
    next: &MapProps<M>,
    map: &mut M,
) -> Result<Reconciliation, Error<M::Error>> {
    let mut reconciliation = Reconciliation::default();
    for step in PIPELINE {
        if step.run(previous, next, map)? {
            log::trace!("Applied {step:?}.");
            reconciliation.applied.push(step);
        }
    }
    Ok(reconciliation)
}

impl Step {
    /// Apply the step if the property it looks at changed. Returns whether it did.
    fn run<M: MapHandle>(
        self,
        previous: &MapProps<M>,
        next: &MapProps<M>,
        map: &mut M,
    ) -> Result<bool, Error<M::Error>> {
        match self {
            Step::Animate => match &next.animation {
                Some(animation) if !same_animation(previous.animation.as_ref(), animation) => {
                    map.view_mut().animate(animation);
                    Ok(true)
                }
                _ => Ok(false),
            },
            Step::ReplaceLayers => {
                if same_layers(&previous.layers, &next.layers) {
                    Ok(false)
                } else {
                    replace_layers(map, &next.layers)?;
                    Ok(true)
                }
            }
            Step::Center => {
                if previous.center == next.center {
                    Ok(false)
                } else {
                    map.view_mut().set_center(next.center);
                    Ok(true)
                }
            }
            Step::Fit => match next.extent {
                Some(extent) if previous.extent != next.extent => {
                    map.view_mut()
                        .fit(extent, Some(&next.fit_options))
                        .map_err(|source| Error::Fit { extent, source })?;
                    Ok(true)
                }
                _ => Ok(false),
            },
            Step::Zoom => match next.zoom {
                Some(zoom) if previous.zoom != next.zoom => {
                    map.view_mut().set_zoom(zoom);
                    Ok(true)
                }
                _ => Ok(false),
            },
            Step::Resolution => match next.resolution {
                // Engine may have reached the resolution on its own, e.g. by the user zooming.
                Some(resolution)
                    if previous.resolution != next.resolution
                        && map.view().resolution() != Some(resolution) =>
                {
                    map.view_mut().set_resolution(resolution);
                    Ok(true)
                }
                _ => Ok(false),
            },
        }
    }
}

fn same_animation(previous: Option<&Rc<AnimationOptions>>, next: &Rc<AnimationOptions>) -> bool {
    previous.is_some_and(|previous| Rc::ptr_eq(previous, next))
}

/// Clear the map, then initialize `layers` in order. There is no rollback: when a layer fails,
/// the ones before it stay attached.
pub(crate) fn replace_layers<M: MapHandle>(
    map: &mut M,
    layers: &[Rc<dyn Layer<M>>],
) -> Result<(), Error<M::Error>> {
    log::debug!("Replacing layers with {} new ones.", layers.len());
    map.clear_layers();

    for (index, layer) in layers.iter().enumerate() {
        log::trace!("Initializing layer #{index} ({}).", layer.name());
        layer.init(map).map_err(|source| Error::Layer {
            index,
            name: layer.name().to_owned(),
            source,
        })?;
    }

    Ok(())
}
