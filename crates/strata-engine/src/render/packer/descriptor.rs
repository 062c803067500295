use super::LayoutError;

/// Model-coordinate position, present in every layout.
pub const POSITION_ATTRIBUTE: &str = "vertexMC";
/// Per-vertex color; always the last slot when present.
pub const COLOR_ATTRIBUTE: &str = "scalarColor";

/// Component type of an attribute. Packed buffers are float-only.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    #[default]
    Float32,
}

impl ScalarKind {
    /// Size of one component in bytes.
    pub const fn size(self) -> u32 {
        match self {
            ScalarKind::Float32 => 4,
        }
    }
}

/// One named attribute within a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSlot {
    pub name: String,
    /// Shader input location.
    pub location: u32,
    /// Byte offset within the vertex.
    pub offset: u32,
    pub components: u32,
    pub kind: ScalarKind,
    pub normalized: bool,
}

impl AttributeSlot {
    #[inline]
    pub fn size(&self) -> u32 {
        self.components * self.kind.size()
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.size()
    }
}

/// A validated interleaved vertex layout.
///
/// Slots are kept sorted by offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferDescriptor {
    stride: u32,
    slots: Vec<AttributeSlot>,
}

impl BufferDescriptor {
    pub fn builder() -> BufferDescriptorBuilder {
        BufferDescriptorBuilder::default()
    }

    /// Bytes per vertex.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&AttributeSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Floats per vertex.
    #[inline]
    pub fn point_size(&self) -> u32 {
        self.stride / 4
    }

    /// Byte offset of the color slot; `None` when no color is bound.
    pub fn color_offset(&self) -> Option<u32> {
        self.slot(COLOR_ATTRIBUTE).map(|s| s.offset)
    }

    pub fn color_components(&self) -> u32 {
        self.slot(COLOR_ATTRIBUTE).map_or(0, |s| s.components)
    }
}

/// Builds a [`BufferDescriptor`].
///
/// [`attribute`](Self::attribute) packs slots back to back with consecutive
/// locations; [`attribute_at`](Self::attribute_at) places one explicitly.
/// The stride defaults to the end of the furthest slot.
#[derive(Debug, Clone, Default)]
pub struct BufferDescriptorBuilder {
    slots: Vec<AttributeSlot>,
    stride: Option<u32>,
    next_offset: u32,
    next_location: u32,
}

impl BufferDescriptorBuilder {
    pub fn attribute(self, name: impl Into<String>, components: u32) -> Self {
        let (location, offset) = (self.next_location, self.next_offset);
        self.attribute_at(name, location, offset, components)
    }

    pub fn attribute_at(
        mut self,
        name: impl Into<String>,
        location: u32,
        offset: u32,
        components: u32,
    ) -> Self {
        let slot = AttributeSlot {
            name: name.into(),
            location,
            offset,
            components,
            kind: ScalarKind::Float32,
            normalized: false,
        };
        self.next_offset = self.next_offset.max(slot.end());
        self.next_location = self.next_location.max(location + 1);
        self.slots.push(slot);
        self
    }

    /// Appends the color slot, or nothing for `components == 0`.
    pub fn color(self, components: u32) -> Self {
        if components == 0 {
            return self;
        }
        self.attribute(COLOR_ATTRIBUTE, components)
    }

    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn build(self) -> Result<BufferDescriptor, LayoutError> {
        let mut slots = self.slots;
        for slot in &slots {
            if !(1..=4).contains(&slot.components) {
                return Err(LayoutError::InvalidComponents {
                    name: slot.name.clone(),
                    components: slot.components,
                });
            }
            if slot.offset % 4 != 0 {
                return Err(LayoutError::Misaligned { name: slot.name.clone(), offset: slot.offset });
            }
        }

        let stride = self
            .stride
            .unwrap_or_else(|| slots.iter().map(AttributeSlot::end).max().unwrap_or(0));
        if stride == 0 || stride % 4 != 0 {
            return Err(LayoutError::InvalidStride { stride });
        }

        for (i, slot) in slots.iter().enumerate() {
            if slot.end() > stride {
                return Err(LayoutError::OutOfStride { name: slot.name.clone(), end: slot.end(), stride });
            }
            let clash = slots[..i]
                .iter()
                .any(|other| other.name == slot.name || other.location == slot.location);
            if clash {
                return Err(LayoutError::Duplicate { name: slot.name.clone() });
            }
        }

        slots.sort_by_key(|s| s.offset);
        for pair in slots.windows(2) {
            if pair[0].end() > pair[1].offset {
                return Err(LayoutError::Overlap {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        Ok(BufferDescriptor { stride, slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_slots_pack_back_to_back() {
        let d = BufferDescriptor::builder()
            .attribute(POSITION_ATTRIBUTE, 3)
            .attribute("orientMC", 3)
            .attribute("offsetMC", 3)
            .attribute("radiusMC", 1)
            .color(4)
            .build()
            .unwrap();
        let offsets: Vec<u32> = d.slots().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, [0, 12, 24, 36, 40]);
        assert_eq!(d.stride(), 56);
        assert_eq!(d.point_size(), 14);
        assert_eq!(d.color_offset(), Some(40));
        assert_eq!(d.slot("radiusMC").unwrap().location, 3);
    }

    #[test]
    fn no_color_means_no_color_offset() {
        let d = BufferDescriptor::builder().attribute(POSITION_ATTRIBUTE, 3).color(0).build().unwrap();
        assert_eq!(d.color_offset(), None);
        assert_eq!(d.color_components(), 0);
        assert_eq!(d.point_size(), 3);
    }

    #[test]
    fn explicit_stride_may_leave_padding() {
        let d = BufferDescriptor::builder().attribute("a", 2).stride(16).build().unwrap();
        assert_eq!(d.stride(), 16);
    }

    #[test]
    fn rejects_bad_layouts() {
        let overlap = BufferDescriptor::builder()
            .attribute_at("a", 0, 0, 3)
            .attribute_at("b", 1, 8, 2)
            .build();
        assert_eq!(overlap, Err(LayoutError::Overlap { first: "a".into(), second: "b".into() }));

        let misaligned = BufferDescriptor::builder().attribute_at("a", 0, 2, 1).build();
        assert!(matches!(misaligned, Err(LayoutError::Misaligned { offset: 2, .. })));

        let too_long = BufferDescriptor::builder().attribute("a", 3).stride(8).build();
        assert!(matches!(too_long, Err(LayoutError::OutOfStride { end: 12, stride: 8, .. })));

        let dup = BufferDescriptor::builder().attribute("a", 1).attribute("a", 1).build();
        assert!(matches!(dup, Err(LayoutError::Duplicate { .. })));

        let wide = BufferDescriptor::builder().attribute("a", 5).build();
        assert!(matches!(wide, Err(LayoutError::InvalidComponents { components: 5, .. })));

        assert_eq!(
            BufferDescriptor::builder().build(),
            Err(LayoutError::InvalidStride { stride: 0 })
        );
    }
}
