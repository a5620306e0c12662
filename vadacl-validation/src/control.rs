// Form controls

use crate::{ValidationErrors, ValidatorFn};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// A bindable input, or a group or array of inputs.
///
/// The form layer owns controls; validators only read them, and the
/// visibility helpers only read their flags and errors.
pub trait Control {
    /// Current value. Groups and arrays report their children's values.
    fn value(&self) -> Cow<'_, Value>;

    /// Child controls in order. Empty for a single field.
    fn children(&self) -> Vec<&dyn Control> {
        Vec::new()
    }

    /// Whether this control groups other controls.
    fn is_collection(&self) -> bool {
        false
    }

    /// The value changed since creation or the last reset.
    fn dirty(&self) -> bool;

    fn pristine(&self) -> bool {
        !self.dirty()
    }

    /// The control lost focus at least once.
    fn touched(&self) -> bool;

    fn untouched(&self) -> bool {
        !self.touched()
    }

    /// Errors recorded by the last validation run, if any.
    fn errors(&self) -> Option<&ValidationErrors>;

    fn valid(&self) -> bool {
        self.errors().is_none_or(ValidationErrors::is_empty)
    }

    fn invalid(&self) -> bool {
        !self.valid()
    }

    fn set_value(&mut self, value: Value);

    fn mark_as_dirty(&mut self);

    fn mark_as_touched(&mut self);

    fn mark_as_untouched(&mut self);
}

/// Set a control's value as if the user had edited it: the control is
/// always marked dirty, and touched unless `mark_touched` is false.
///
/// Only `control` and its descendants are re-validated. To edit a child
/// of a [`FormControl`] group or array and keep the parent's collection
/// rules current, go through the parent with
/// [`FormControl::set_child_value`], [`FormControl::set_element_value`]
/// or [`FormControl::set_path_value`].
pub fn set_control_value(control: &mut dyn Control, value: Value, mark_touched: bool) {
    control.set_value(value);
    control.mark_as_dirty();
    if mark_touched {
        control.mark_as_touched();
    }
}

#[derive(Clone)]
enum Shape {
    Field(Value),
    Group(Vec<(String, FormControl)>),
    Array(Vec<FormControl>),
}

/// In-memory control tree with bound validators.
///
/// Writing a value re-runs the control's validators and records their
/// outcomes, in validator order, as the control's errors.
#[derive(Clone)]
pub struct FormControl {
    shape: Shape,
    dirty: bool,
    touched: bool,
    validators: Vec<ValidatorFn>,
    errors: Option<ValidationErrors>,
}

impl FormControl {
    /// A single field holding `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_shape(Shape::Field(value.into()))
    }

    /// A field starting out empty (`null`).
    pub fn empty() -> Self {
        Self::new(Value::Null)
    }

    /// Named children, kept in the given order.
    pub fn group<K, I>(controls: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FormControl)>,
    {
        let children = controls.into_iter().map(|(name, c)| (name.into(), c)).collect();
        Self::with_shape(Shape::Group(children))
    }

    /// Indexed children.
    pub fn array<I>(controls: I) -> Self
    where
        I: IntoIterator<Item = FormControl>,
    {
        Self::with_shape(Shape::Array(controls.into_iter().collect()))
    }

    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            dirty: false,
            touched: false,
            validators: Vec::new(),
            errors: None,
        }
    }

    /// Bind validators and evaluate them immediately.
    pub fn with_validators(mut self, validators: Vec<ValidatorFn>) -> Self {
        self.validators = validators;
        self.update_value_and_validity();
        self
    }

    /// Replace the bound validators. Errors are not recomputed until
    /// [`update_value_and_validity`](Self::update_value_and_validity) runs.
    pub fn set_validators(&mut self, validators: Vec<ValidatorFn>) {
        self.validators = validators;
    }

    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Run the bound validators against the current value.
    pub fn update_value_and_validity(&mut self) {
        let control: &dyn Control = &*self;
        let outcomes: ValidationErrors = self
            .validators
            .iter()
            .filter_map(|validator| validator(control))
            .collect();

        self.errors = if outcomes.is_empty() { None } else { Some(outcomes) };
    }

    /// Record errors from outside the bound validators, e.g. a server-side
    /// check. They last until the next validation run.
    pub fn set_errors(&mut self, errors: Option<ValidationErrors>) {
        self.errors = errors.filter(|e| !e.is_empty());
    }

    pub fn mark_as_pristine(&mut self) {
        self.dirty = false;
        for child in self.children_mut() {
            child.mark_as_pristine();
        }
    }

    /// Clear values and interaction flags throughout the tree, then
    /// re-validate.
    pub fn reset(&mut self) {
        if let Shape::Field(value) = &mut self.shape {
            *value = Value::Null;
        }
        for child in self.children_mut() {
            child.reset();
        }
        self.dirty = false;
        self.touched = false;
        self.update_value_and_validity();
    }

    /// Child of a group by name.
    pub fn get(&self, name: &str) -> Option<&FormControl> {
        match &self.shape {
            Shape::Group(children) => children.iter().find(|(n, _)| n == name).map(|(_, c)| c),
            _ => None,
        }
    }

    /// Mutable child of a group by name.
    ///
    /// Edits made through this reference re-run the child's validators
    /// only. Use [`set_child_value`](Self::set_child_value) or
    /// [`set_path_value`](Self::set_path_value) so group-level rules see
    /// the new value too.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormControl> {
        match &mut self.shape {
            Shape::Group(children) => children.iter_mut().find(|(n, _)| n == name).map(|(_, c)| c),
            _ => None,
        }
    }

    /// Child of an array by index.
    pub fn at(&self, index: usize) -> Option<&FormControl> {
        match &self.shape {
            Shape::Array(children) => children.get(index),
            _ => None,
        }
    }

    /// Mutable child of an array by index. Same caveat as
    /// [`get_mut`](Self::get_mut).
    pub fn at_mut(&mut self, index: usize) -> Option<&mut FormControl> {
        match &mut self.shape {
            Shape::Array(children) => children.get_mut(index),
            _ => None,
        }
    }

    /// Edit one child of a group with [`set_control_value`], then
    /// re-validate the group. Returns false if there is no such child.
    pub fn set_child_value(&mut self, name: &str, value: Value, mark_touched: bool) -> bool {
        self.set_at(&[name], value, mark_touched)
    }

    /// Edit one element of an array with [`set_control_value`], then
    /// re-validate the array. Returns false if the index is out of range.
    pub fn set_element_value(&mut self, index: usize, value: Value, mark_touched: bool) -> bool {
        let Some(child) = self.at_mut(index) else {
            return false;
        };
        set_control_value(child, value, mark_touched);
        self.update_value_and_validity();
        true
    }

    /// Edit a nested control addressed by a dotted path such as
    /// `"address.zip"` or `"excursions.2"`, where numeric segments index
    /// arrays. Every control along the path is re-validated, innermost
    /// first. An empty path edits this control.
    pub fn set_path_value(&mut self, path: &str, value: Value, mark_touched: bool) -> bool {
        let segments: Vec<&str> = if path.is_empty() { Vec::new() } else { path.split('.').collect() };
        self.set_at(&segments, value, mark_touched)
    }

    fn set_at(&mut self, segments: &[&str], value: Value, mark_touched: bool) -> bool {
        let Some((segment, rest)) = segments.split_first() else {
            set_control_value(self, value, mark_touched);
            return true;
        };

        let child = match &mut self.shape {
            Shape::Group(children) => children.iter_mut().find(|(n, _)| n == segment).map(|(_, c)| c),
            Shape::Array(children) => segment.parse::<usize>().ok().and_then(|i| children.get_mut(i)),
            Shape::Field(_) => None,
        };
        let Some(child) = child else {
            vadacl_log::debug!("No control at path segment {}", segment);
            return false;
        };
        if !child.set_at(rest, value, mark_touched) {
            return false;
        }

        self.update_value_and_validity();
        true
    }

    /// Append to an array control and re-validate it. Ignored for other
    /// shapes.
    pub fn push(&mut self, control: FormControl) {
        let Shape::Array(children) = &mut self.shape else {
            return;
        };
        children.push(control);
        self.update_value_and_validity();
    }

    pub fn len(&self) -> usize {
        match &self.shape {
            Shape::Field(_) => 0,
            Shape::Group(children) => children.len(),
            Shape::Array(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn children_mut(&mut self) -> Vec<&mut FormControl> {
        match &mut self.shape {
            Shape::Field(_) => Vec::new(),
            Shape::Group(children) => children.iter_mut().map(|(_, c)| c).collect(),
            Shape::Array(children) => children.iter_mut().collect(),
        }
    }

    fn own_children(&self) -> Vec<&FormControl> {
        match &self.shape {
            Shape::Field(_) => Vec::new(),
            Shape::Group(children) => children.iter().map(|(_, c)| c).collect(),
            Shape::Array(children) => children.iter().collect(),
        }
    }
}

impl Control for FormControl {
    fn value(&self) -> Cow<'_, Value> {
        match &self.shape {
            Shape::Field(value) => Cow::Borrowed(value),
            Shape::Group(children) => {
                let map: Map<String, Value> = children
                    .iter()
                    .map(|(name, c)| (name.clone(), c.value().into_owned()))
                    .collect();
                Cow::Owned(Value::Object(map))
            }
            Shape::Array(children) => {
                Cow::Owned(Value::Array(children.iter().map(|c| c.value().into_owned()).collect()))
            }
        }
    }

    fn children(&self) -> Vec<&dyn Control> {
        self.own_children().into_iter().map(|c| c as &dyn Control).collect()
    }

    fn is_collection(&self) -> bool {
        !matches!(self.shape, Shape::Field(_))
    }

    fn dirty(&self) -> bool {
        self.dirty || self.own_children().iter().any(|c| c.dirty())
    }

    fn touched(&self) -> bool {
        self.touched || self.own_children().iter().any(|c| c.touched())
    }

    fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    fn valid(&self) -> bool {
        self.errors.is_none() && self.own_children().iter().all(|c| c.valid())
    }

    /// Fields take the value as is. Groups hand each member of an object to
    /// the child of the same name, arrays hand elements over by index;
    /// children without a counterpart keep their value.
    fn set_value(&mut self, value: Value) {
        match (&mut self.shape, value) {
            (Shape::Field(current), value) => *current = value,
            (Shape::Group(children), Value::Object(mut members)) => {
                for (name, child) in children.iter_mut() {
                    if let Some(member) = members.remove(name.as_str()) {
                        child.set_value(member);
                    }
                }
            }
            (Shape::Array(children), Value::Array(elements)) => {
                for (child, element) in children.iter_mut().zip(elements) {
                    child.set_value(element);
                }
            }
            (_, other) => {
                vadacl_log::debug!("Ignoring value {} for a collection control of another shape", other);
            }
        }
        self.update_value_and_validity();
    }

    fn mark_as_dirty(&mut self) {
        self.dirty = true;
    }

    fn mark_as_touched(&mut self) {
        self.touched = true;
    }

    fn mark_as_untouched(&mut self) {
        self.touched = false;
        for child in self.children_mut() {
            child.mark_as_untouched();
        }
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("value", &self.value())
            .field("dirty", &self.dirty)
            .field("touched", &self.touched)
            .field("validators", &self.validators.len())
            .field("errors", &self.errors)
            .finish()
    }
}

impl Default for FormControl {
    fn default() -> Self {
        Self::empty()
    }
}
