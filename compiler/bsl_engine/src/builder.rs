//! Program assembly with symbolic labels.
//!
//! ```text
//! let mut b = ProgramBuilder::new();
//! let body = b.label("body");
//! b.call(body);
//! b.halt();
//! b.bind(body)?;
//! b.read(Scalar::unsigned(IntWidth::W8, Endian::Big), Some("tag"));
//! b.ret();
//! let program = b.finish()?;
//! ```

use bsl_ir::BitsetType;
use rustc_hash::FxHashMap;

use crate::{
    BitsetLayout, Endian, FieldId, Instr, InstrId, LayoutId, Length, Program, ProgramError,
    Scalar,
};

/// A symbolic jump target, resolved by [`ProgramBuilder::finish`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label(u32);

struct LabelInfo {
    name: String,
    bound: Option<InstrId>,
}

#[derive(Default)]
pub struct ProgramBuilder {
    instrs: Vec<Instr>,
    fields: Vec<String>,
    field_ids: FxHashMap<String, FieldId>,
    layouts: Vec<BitsetLayout>,
    labels: Vec<LabelInfo>,
    label_ids: FxHashMap<String, Label>,
    /// Instructions whose target is still a label.
    fixups: Vec<(InstrId, Label)>,
    entry: Option<Label>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the label called `name`.
    pub fn label(&mut self, name: &str) -> Label {
        if let Some(label) = self.label_ids.get(name) {
            return *label;
        }
        let label = Label(crate::to_u32(self.labels.len()));
        self.labels.push(LabelInfo {
            name: name.to_owned(),
            bound: None,
        });
        self.label_ids.insert(name.to_owned(), label);
        label
    }

    /// Bind `label` to the next instruction emitted.
    pub fn bind(&mut self, label: Label) -> Result<(), ProgramError> {
        let next = self.next_id();
        let Some(info) = self.labels.get_mut(label.0 as usize) else {
            return Err(foreign_label(label));
        };
        if info.bound.is_some() {
            return Err(ProgramError::RedefinedLabel(info.name.clone()));
        }
        info.bound = Some(next);
        Ok(())
    }

    /// Start execution at `label` instead of the first instruction.
    pub fn set_entry(&mut self, label: Label) {
        self.entry = Some(label);
    }

    /// Intern a field name.
    pub fn field(&mut self, name: &str) -> FieldId {
        if let Some(id) = self.field_ids.get(name) {
            return *id;
        }
        let id = FieldId::new(crate::to_u32(self.fields.len()));
        self.fields.push(name.to_owned());
        self.field_ids.insert(name.to_owned(), id);
        id
    }

    pub fn layout(&mut self, layout: BitsetLayout) -> LayoutId {
        let id = LayoutId::new(crate::to_u32(self.layouts.len()));
        self.layouts.push(layout);
        id
    }

    fn next_id(&self) -> InstrId {
        InstrId::new(crate::to_u32(self.instrs.len()))
    }

    fn field_opt(&mut self, name: Option<&str>) -> Option<FieldId> {
        name.map(|n| self.field(n))
    }

    pub fn emit(&mut self, instr: Instr) -> InstrId {
        let id = self.next_id();
        self.instrs.push(instr);
        id
    }

    fn emit_to(&mut self, instr: Instr, label: Label) -> InstrId {
        let id = self.emit(instr);
        self.fixups.push((id, label));
        id
    }

    pub fn read(&mut self, scalar: Scalar, field: Option<&str>) -> InstrId {
        let field = self.field_opt(field);
        self.emit(Instr::Read {
            scalar,
            field,
            keep: false,
        })
    }

    /// Read an integer and also push it for later use as a length or count.
    pub fn read_kept(&mut self, scalar: Scalar, field: Option<&str>) -> InstrId {
        let field = self.field_opt(field);
        self.emit(Instr::Read {
            scalar,
            field,
            keep: true,
        })
    }

    pub fn read_bytes(&mut self, len: Length, field: Option<&str>) -> InstrId {
        let field = self.field_opt(field);
        self.emit(Instr::ReadBytes { len, field })
    }

    pub fn read_bitset(&mut self, ty: &BitsetType, endian: Endian, field: Option<&str>) -> InstrId {
        let layout = self.layout(BitsetLayout::from_type(ty));
        let field = self.field_opt(field);
        self.emit(Instr::ReadBitset {
            scalar: Scalar::unsigned(ty.width(), endian),
            layout,
            field,
        })
    }

    pub fn expect(&mut self, scalar: Scalar, value: u64) -> InstrId {
        self.emit(Instr::Expect { scalar, value })
    }

    pub fn skip(&mut self, len: Length) -> InstrId {
        self.emit(Instr::Skip { len })
    }

    pub fn push(&mut self, value: u64) -> InstrId {
        self.emit(Instr::Push(value))
    }

    pub fn drop_top(&mut self) -> InstrId {
        self.emit(Instr::Drop)
    }

    pub fn dup(&mut self) -> InstrId {
        self.emit(Instr::Dup)
    }

    pub fn decrement(&mut self) -> InstrId {
        self.emit(Instr::Decrement)
    }

    pub fn jump(&mut self, label: Label) -> InstrId {
        self.emit_to(Instr::Jump(InstrId::new(0)), label)
    }

    pub fn jump_if_zero(&mut self, label: Label) -> InstrId {
        self.emit_to(Instr::JumpIfZero(InstrId::new(0)), label)
    }

    pub fn call(&mut self, label: Label) -> InstrId {
        self.emit_to(Instr::Call(InstrId::new(0)), label)
    }

    pub fn ret(&mut self) -> InstrId {
        self.emit(Instr::Return)
    }

    pub fn enter(&mut self, name: &str) -> InstrId {
        let field = self.field(name);
        self.emit(Instr::Enter(field))
    }

    pub fn leave(&mut self) -> InstrId {
        self.emit(Instr::Leave)
    }

    pub fn halt(&mut self) -> InstrId {
        self.emit(Instr::Halt)
    }

    fn resolve(&self, label: Label) -> Result<InstrId, ProgramError> {
        let info = self
            .labels
            .get(label.0 as usize)
            .ok_or_else(|| foreign_label(label))?;
        info.bound
            .ok_or_else(|| ProgramError::UndefinedLabel(info.name.clone()))
    }

    /// Resolve labels and validate the result.
    #[tracing::instrument(level = "debug", skip_all, fields(instrs = self.instrs.len()))]
    pub fn finish(mut self) -> Result<Program, ProgramError> {
        let fixups = std::mem::take(&mut self.fixups);
        for (at, label) in fixups {
            let resolved = self.resolve(label)?;
            if let Some(target) = self.instrs[at.index()].target_mut() {
                *target = resolved;
            }
        }
        let entry = match self.entry {
            Some(label) => self.resolve(label)?,
            None => InstrId::new(0),
        };
        tracing::debug!(
            fields = self.fields.len(),
            layouts = self.layouts.len(),
            %entry,
            "program assembled"
        );
        Program::from_parts(self.instrs, self.fields, self.layouts, entry)
    }
}

/// A label this builder never created.
fn foreign_label(label: Label) -> ProgramError {
    ProgramError::UndefinedLabel(format!("<label {}>", label.0))
}
