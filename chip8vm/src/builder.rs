use crate::config::Quirks;
use crate::context::Context;
use crate::machine::Machine;

/// Assembles a ready to run `Machine`
///
/// Context and program are mandatory, quirks fall back to `Quirks::default()`.
pub struct Builder<'a, C: Context> {
    context: Option<C>,
    quirks: Quirks,
    program: Option<&'a [u8]>,
}

impl<'a, C: Context> Default for Builder<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: Context> Builder<'a, C> {
    pub fn new() -> Self {
        Self {
            context: None,
            quirks: Quirks::default(),
            program: None,
        }
    }

    pub fn with_context(mut self, ctx: C) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_program(mut self, prog: &'a [u8]) -> Self {
        self.program = Some(prog);
        self
    }

    pub fn build(self) -> Result<Machine<C>, &'static str> {
        let context = self.context.ok_or("Context not provided")?;
        let program = self.program.ok_or("Program not provided")?;
        let mut machine = Machine::new(context, self.quirks);
        machine.load(program);
        Ok(machine)
    }
}
