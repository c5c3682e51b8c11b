//! Widget decoration of editing view elements

use crate::error::Result;
use std::rc::Rc;
use view::{DowncastWriter, Element, NodeId, PropertyKey, ViewDocument};

pub const WIDGET_CLASS: &str = "ck-widget";
pub const WIDGET_PROPERTY: &str = "widget";
pub const WIDGET_LABEL_PROPERTY: &str = "widgetLabel";

/// Turn an element into a non-editable widget.
///
/// The element never receives a block filler.
pub fn to_widget(writer: &mut DowncastWriter<'_>, node_id: NodeId, label: &str) -> Result<()> {
    writer.set_attribute(node_id, "contenteditable", "false")?;
    writer.add_class(node_id, WIDGET_CLASS)?;
    writer.set_custom_property(node_id, WIDGET_PROPERTY, true)?;
    writer.set_custom_property(node_id, WIDGET_LABEL_PROPERTY, label.to_string())?;
    writer.set_filler_offset(node_id, Some(Rc::new(|_: &ViewDocument, _: NodeId| None)))?;
    Ok(())
}

pub fn is_widget(element: &Element) -> bool {
    element
        .custom_property_as::<bool>(&PropertyKey::from(WIDGET_PROPERTY))
        .copied()
        .unwrap_or(false)
}

pub fn widget_label(element: &Element) -> Option<&str> {
    element
        .custom_property_as::<String>(&PropertyKey::from(WIDGET_LABEL_PROPERTY))
        .map(String::as_str)
}
