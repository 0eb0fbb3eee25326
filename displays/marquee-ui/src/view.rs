//! Views and the view controller

use heapless::Vec;

use crate::surface::Surface;

/// Identifier a view answers to
pub type ViewId = u8;

/// Outcome of offering an input event to a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Not for this view
    Ignored,
    /// Consumed; the view stays active
    Handled,
    /// Consumed; switch to another view
    Switch(ViewId),
}

/// One full-screen UI state
///
/// Only `refresh` is required. The defaults redraw the whole
/// screen: clear, `refresh`, present everything.
pub trait View<S: Surface> {
    /// Input events this view understands
    type Input;

    /// One-time setup after the display is up (asset loads etc.)
    fn init(&mut self, _surface: &mut S) -> Result<(), S::Error> {
        Ok(())
    }

    /// Draw the complete view into the canvas
    fn refresh(&mut self, surface: &mut S) -> Result<(), S::Error>;

    /// Become the active view
    fn show(&mut self, surface: &mut S) -> Result<(), S::Error> {
        surface.canvas().clear(0);
        self.refresh(surface)?;
        surface.present_all()
    }

    /// Stop being the active view
    fn hide(&mut self, _surface: &mut S) -> Result<(), S::Error> {
        Ok(())
    }

    /// Periodic tick while active
    fn update(&mut self, _surface: &mut S, _now_ms: u32) -> Result<(), S::Error> {
        Ok(())
    }

    /// Redraw after something else covered the screen
    ///
    /// `partial` is set when only a region (such as a closed popup) needs
    /// restoring; views that cannot redraw partially ignore it.
    fn invalidate(&mut self, surface: &mut S, _partial: bool) -> Result<(), S::Error> {
        surface.canvas().clear(0);
        self.refresh(surface)?;
        surface.present_all()
    }

    fn handle_input(&mut self, _surface: &mut S, _input: Self::Input) -> Result<Response, S::Error> {
        Ok(Response::Ignored)
    }
}

/// Fixed set of views with at most one active
///
/// Views are looked up by the id they were registered under.
pub struct ViewController<V, const N: usize> {
    views: Vec<(ViewId, V), N>,
    active: Option<usize>,
}

impl<V, const N: usize> Default for ViewController<V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, const N: usize> ViewController<V, N> {
    pub const fn new() -> Self {
        Self {
            views: Vec::new(),
            active: None,
        }
    }

    /// Register `view` under `id`; gives it back when the controller is full
    pub fn add(&mut self, id: ViewId, view: V) -> Result<(), V> {
        self.views.push((id, view)).map_err(|(_, view)| view)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The active view, if one has been shown
    pub fn active(&self) -> Option<&V> {
        self.active.and_then(|i| self.views.get(i)).map(|(_, v)| v)
    }

    pub fn active_mut(&mut self) -> Option<&mut V> {
        self.active.and_then(|i| self.views.get_mut(i)).map(|(_, v)| v)
    }

    /// Id of the active view
    pub fn active_id(&self) -> Option<ViewId> {
        self.active.and_then(|i| self.views.get(i)).map(|(id, _)| *id)
    }

    fn position(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|(vid, _)| *vid == id)
    }

    /// View registered under `id`
    pub fn get(&self, id: ViewId) -> Option<&V> {
        self.position(id).map(|i| &self.views[i].1)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut V> {
        self.position(id).map(|i| &mut self.views[i].1)
    }

    /// Call `init` on every view in registration order
    pub fn init_all<S: Surface>(&mut self, surface: &mut S) -> Result<(), S::Error>
    where
        V: View<S>,
    {
        for (_, view) in self.views.iter_mut() {
            view.init(surface)?;
        }
        Ok(())
    }

    /// Make `id` the active view
    ///
    /// Every other view is hidden first. Returns `false` when no view has
    /// that id, in which case nothing changes.
    pub fn show<S: Surface>(&mut self, surface: &mut S, id: ViewId) -> Result<bool, S::Error>
    where
        V: View<S>,
    {
        let Some(target) = self.position(id) else {
            warn!("no view with id {}", id);
            return Ok(false);
        };

        for (i, (_, view)) in self.views.iter_mut().enumerate() {
            if i != target {
                view.hide(surface)?;
            }
        }
        self.active = Some(target);
        debug!("view {} active", id);
        self.views[target].1.show(surface)?;
        Ok(true)
    }

    /// Tick the active view
    pub fn update<S: Surface>(&mut self, surface: &mut S, now_ms: u32) -> Result<(), S::Error>
    where
        V: View<S>,
    {
        match self.active_mut() {
            Some(view) => view.update(surface, now_ms),
            None => Ok(()),
        }
    }

    /// Ask the active view to redraw
    pub fn invalidate<S: Surface>(&mut self, surface: &mut S, partial: bool) -> Result<(), S::Error>
    where
        V: View<S>,
    {
        match self.active_mut() {
            Some(view) => view.invalidate(surface, partial),
            None => Ok(()),
        }
    }

    /// Offer `input` to the active view and follow any requested switch
    ///
    /// Returns whether the input was consumed.
    pub fn handle_input<S: Surface>(&mut self, surface: &mut S, input: <V as View<S>>::Input) -> Result<bool, S::Error>
    where
        V: View<S>,
    {
        let Some(view) = self.active_mut() else {
            return Ok(false);
        };
        match view.handle_input(surface, input)? {
            Response::Ignored => Ok(false),
            Response::Handled => Ok(true),
            Response::Switch(next) => {
                self.show(surface, next)?;
                Ok(true)
            }
        }
    }
}
