//! A validated instruction table.

use crate::{BitsetLayout, FieldId, Instr, InstrId, LayoutId, ProgramError};

/// Instructions plus the side tables they index into.
///
/// A `Program` is immutable once built and is shared between engines
/// (typically through an `Arc`).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Program {
    instrs: Vec<Instr>,
    fields: Vec<String>,
    layouts: Vec<BitsetLayout>,
    entry: InstrId,
}

impl Program {
    /// Assemble and validate a program from raw parts.
    pub fn from_parts(
        instrs: Vec<Instr>,
        fields: Vec<String>,
        layouts: Vec<BitsetLayout>,
        entry: InstrId,
    ) -> Result<Self, ProgramError> {
        let program = Program {
            instrs,
            fields,
            layouts,
            entry,
        };
        program.validate()?;
        Ok(program)
    }

    /// Check that every target, field and layout reference is in range.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.get(self.entry).is_none() {
            return Err(ProgramError::InvalidTarget {
                at: self.entry,
                reason: format!("entry point outside a {}-instruction program", self.len()),
            });
        }

        for (at, instr) in self.iter() {
            if let Some(target) = instr.target() {
                if self.get(target).is_none() {
                    return Err(ProgramError::InvalidTarget {
                        at,
                        reason: format!("target {target} is outside the program"),
                    });
                }
            }
            if let Some(field) = instr.field() {
                if self.fields.get(field.index()).is_none() {
                    return Err(ProgramError::InvalidTarget {
                        at,
                        reason: format!("unknown {field}"),
                    });
                }
            }
            if let Instr::ReadBitset { scalar, layout, .. } = instr {
                let Some(lowered) = self.layouts.get(layout.index()) else {
                    return Err(ProgramError::InvalidTarget {
                        at,
                        reason: format!("unknown {layout}"),
                    });
                };
                if let Some((name, position)) = lowered.out_of_range() {
                    return Err(ProgramError::InvalidTarget {
                        at,
                        reason: format!(
                            "{layout} puts `{name}` at bit {position} of a {}-bit value",
                            lowered.width().bits()
                        ),
                    });
                }
                if lowered.width() != scalar.width {
                    return Err(ProgramError::InvalidTarget {
                        at,
                        reason: format!(
                            "{layout} is {} bits wide, read is {}",
                            lowered.width().bits(),
                            scalar.width.bits()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn entry(&self) -> InstrId {
        self.entry
    }

    #[inline]
    pub fn get(&self, ip: InstrId) -> Option<&Instr> {
        self.instrs.get(ip.index())
    }

    /// Name of a field. Validation guarantees every id in the program
    /// resolves.
    pub fn field_name(&self, field: FieldId) -> &str {
        self.fields.get(field.index()).map_or("", String::as_str)
    }

    pub fn layout(&self, layout: LayoutId) -> Option<&BitsetLayout> {
        self.layouts.get(layout.index())
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstrId, &Instr)> {
        self.instrs
            .iter()
            .enumerate()
            .map(|(i, instr)| (InstrId::new(crate::to_u32(i)), instr))
    }
}

#[cfg(test)]
mod tests;
