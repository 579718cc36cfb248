//! The keypad state machine.
//!
//! The engine owns the typed entry, the pending operand and operator, the
//! memory register and the history log. Every action validates its own
//! preconditions and degrades to a no-op, so no key sequence can fail.

use super::action::{Action, MemoryOp};
use super::evaluation::{Notice, Operator, apply, format_number, parse_number, reciprocal};
use super::snapshot::Snapshot;
use tracing::{debug, warn};

/// Calculator state plus the two display lines derived from it.
#[derive(Clone, Debug)]
pub struct Engine {
    /// Typed text, kept verbatim (trailing `.` and all).
    entry: String,
    operand: Option<f64>,
    pending_op: Option<Operator>,
    /// Set right after a result is shown; the next digit starts over and
    /// the next operator chains from the result.
    after_equals: bool,
    memory: Option<f64>,
    /// Chronological "expression = result" records.
    history: Vec<String>,
    display_text: String,
    operation_text: String,
    notices: Vec<Notice>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        let mut engine = Self {
            entry: String::new(),
            operand: None,
            pending_op: None,
            after_equals: false,
            memory: None,
            history: Vec::new(),
            display_text: String::new(),
            operation_text: String::new(),
            notices: Vec::new(),
        };
        engine.update_display();
        engine
    }

    /// Rebuild an engine from a saved snapshot.
    ///
    /// The display is always refreshed. If a result was showing, the last
    /// history record goes back on the operation line.
    pub fn restore(snapshot: Snapshot) -> Self {
        let mut engine = Self {
            entry: snapshot.entry,
            operand: snapshot.operand,
            pending_op: snapshot.pending_op,
            after_equals: snapshot.after_equals,
            memory: snapshot.memory,
            history: snapshot.history,
            ..Self::new()
        };

        let pinned = if engine.after_equals {
            engine.history.last().cloned()
        } else {
            None
        };
        engine.refresh_display(true, pinned.as_deref());
        engine
    }

    /// Capture everything needed to resume later.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entry: self.entry.clone(),
            operand: self.operand,
            pending_op: self.pending_op,
            after_equals: self.after_equals,
            history: self.history.clone(),
            memory: self.memory,
        }
    }

    /// Route an action to its handler.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Digit(digit) => self.append_digit(digit),
            Action::Operator(op) => self.on_operator(op),
            Action::Equals => self.on_equals(),
            Action::Square => self.on_square(),
            Action::Reciprocal => self.on_reverse(),
            Action::Backspace => self.backspace(),
            Action::ClearEntry => self.clear_entry(),
            Action::ClearAll => self.clear_all(),
            Action::ToggleSign => self.toggle_sign(),
            Action::Memory(kind) => self.memory_op(kind),
        }
    }

    pub fn append_digit(&mut self, digit: char) {
        if !(digit.is_ascii_digit() || digit == '.') {
            debug!(?digit, "Ignoring non-digit key");
            return;
        }

        if self.after_equals {
            self.clear_all();
        }

        if digit == '.' && self.entry.contains('.') {
            return;
        }

        if self.entry == "0" {
            self.entry = digit.to_string();
        } else {
            self.entry.push(digit);
        }
        self.update_display();
    }

    pub fn on_operator(&mut self, op: Operator) {
        let value = if self.entry.is_empty() {
            None
        } else {
            match parse_number(&self.entry) {
                Some(value) => Some(value),
                None => {
                    debug!(entry = %self.entry, "Entry is not a number, ignoring operator");
                    return;
                }
            }
        };

        if self.after_equals {
            self.operand = value;
            self.after_equals = false;
        }

        if let Some(value) = value {
            let next = match self.operand {
                None => value,
                Some(operand) => self.evaluate(operand, value, self.pending_op),
            };
            self.operand = Some(next);
        }

        self.pending_op = Some(op);
        self.entry.clear();
        self.update_display();
    }

    pub fn on_equals(&mut self) {
        let (Some(operand), Some(op)) = (self.operand, self.pending_op) else {
            debug!("Equals without a pending operation");
            return;
        };
        let Some(value) = parse_number(&self.entry) else {
            return;
        };

        let result = self.evaluate(operand, value, Some(op));
        let expression = format!("{} {} {} =", format_number(operand), op, format_number(value));
        let result_text = format_number(result);

        self.history.push(format!("{expression} {result_text}"));
        self.show_result(expression, result_text);
    }

    pub fn on_square(&mut self) {
        let Some(value) = self.entry_value() else {
            return;
        };
        self.finish_unary(format!("sqr({})", format_number(value)), value * value);
    }

    /// Reciprocal of the entry.
    pub fn on_reverse(&mut self) {
        let Some(value) = self.entry_value() else {
            return;
        };
        let result = reciprocal(value);
        if let Some(notice) = result.notice {
            self.raise(notice);
        }
        self.finish_unary(format!("1/({})", format_number(value)), result.value);
    }

    pub fn backspace(&mut self) {
        if self.entry.pop().is_some() {
            self.update_display();
        }
    }

    pub fn clear_entry(&mut self) {
        self.entry = "0".to_string();
        self.after_equals = false;
        self.update_display();
    }

    /// Reset the calculation. Memory and history survive.
    pub fn clear_all(&mut self) {
        self.entry.clear();
        self.operand = None;
        self.pending_op = None;
        self.after_equals = false;
        self.update_display();
    }

    pub fn toggle_sign(&mut self) {
        let Some(value) = self.entry_value() else {
            return;
        };
        if value == 0.0 {
            return;
        }

        self.entry = format_number(-value);
        self.after_equals = false;
        self.update_display();
    }

    /// Apply a memory operation to the value currently on the display.
    ///
    /// `M+`/`M-` leave the operand and pending operator alone.
    pub fn memory_op(&mut self, kind: MemoryOp) {
        let Some(shown) = parse_number(&self.display_text) else {
            debug!(display = %self.display_text, op = kind.label(), "Display is not a number");
            return;
        };

        match kind {
            MemoryOp::Store => self.memory = Some(shown),
            MemoryOp::Clear => self.memory = None,
            MemoryOp::Recall => {
                let Some(memory) = self.memory else {
                    return;
                };
                self.entry = format_number(memory);
                self.operand = None;
                self.pending_op = None;
                self.refresh_display(true, None);
            }
            MemoryOp::Add => {
                self.memory = Some(self.memory.map_or(shown, |memory| memory + shown));
                self.after_equals = true;
            }
            MemoryOp::Subtract => {
                self.memory = Some(self.memory.map_or(-shown, |memory| memory - shown));
                self.after_equals = true;
            }
        }
        debug!(op = kind.label(), memory = ?self.memory, "Memory updated");
    }

    /// Main display line.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Line above the display: the pending operation or the last expression.
    pub fn operation_text(&self) -> &str {
        &self.operation_text
    }

    /// History records, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_memory_set(&self) -> bool {
        self.memory.is_some()
    }

    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn operand(&self) -> Option<f64> {
        self.operand
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_op
    }

    pub fn is_after_equals(&self) -> bool {
        self.after_equals
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn entry_value(&self) -> Option<f64> {
        parse_number(&self.entry)
    }

    fn evaluate(&mut self, a: f64, b: f64, op: Option<Operator>) -> f64 {
        let result = apply(a, b, op);
        if let Some(notice) = result.notice {
            self.raise(notice);
        }
        result.value
    }

    fn raise(&mut self, notice: Notice) {
        warn!(%notice, "Calculation fell back");
        self.notices.push(notice);
    }

    fn finish_unary(&mut self, expression: String, result: f64) {
        let result_text = format_number(result);
        self.history.push(format!("{expression} = {result_text}"));
        self.show_result(format!("{expression} ="), result_text);
    }

    /// Pin a result and its expression on the display.
    fn show_result(&mut self, expression: String, result_text: String) {
        debug!(%expression, result = %result_text, "Result");
        self.display_text.clone_from(&result_text);
        self.operation_text = expression;
        self.entry = result_text;
        self.operand = None;
        self.pending_op = None;
        self.after_equals = true;
    }

    fn update_display(&mut self) {
        self.refresh_display(false, None);
    }

    /// Recompute both display lines. Skipped while a result is pinned,
    /// unless forced.
    fn refresh_display(&mut self, force: bool, expression: Option<&str>) {
        if self.after_equals && !force {
            return;
        }

        self.display_text = if !self.entry.is_empty() {
            self.entry.clone()
        } else if let Some(operand) = self.operand {
            operand.to_string()
        } else {
            "0".to_string()
        };

        self.operation_text = match expression {
            Some(expression) if !expression.is_empty() => expression.to_string(),
            _ => {
                let mut text = String::new();
                if let Some(operand) = self.operand {
                    text.push_str(&format_number(operand));
                }
                if let Some(op) = self.pending_op {
                    text.push(' ');
                    text.push_str(op.symbol());
                    text.push(' ');
                }
                text
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed keypad characters: digits, `.`, `+ - × ÷` and `=`.
    fn press(engine: &mut Engine, keys: &str) {
        for key in keys.chars() {
            match key {
                '=' => engine.on_equals(),
                '+' => engine.on_operator(Operator::Add),
                '-' => engine.on_operator(Operator::Subtract),
                '×' => engine.on_operator(Operator::Multiply),
                '÷' => engine.on_operator(Operator::Divide),
                digit => engine.append_digit(digit),
            }
        }
    }

    fn engine_with(keys: &str) -> Engine {
        let mut engine = Engine::new();
        press(&mut engine, keys);
        engine
    }

    #[test]
    fn test_fresh_engine_shows_zero() {
        let engine = Engine::new();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.operation_text(), "");
        assert!(engine.history().is_empty());
        assert!(!engine.is_memory_set());
    }

    #[test]
    fn test_simple_addition() {
        let engine = engine_with("5+3=");
        assert_eq!(engine.display_text(), "8");
        assert_eq!(engine.operation_text(), "5 + 3 =");
        assert_eq!(engine.history(), ["5 + 3 = 8"]);
        assert!(engine.is_after_equals());
        assert_eq!(engine.entry(), "8");
        assert_eq!(engine.operand(), None);
        assert_eq!(engine.pending_operator(), None);
    }

    #[test]
    fn test_chaining_from_result() {
        let mut engine = engine_with("5+3=");
        press(&mut engine, "×2=");
        assert_eq!(engine.display_text(), "16");
        assert_eq!(engine.history(), ["5 + 3 = 8", "8 × 2 = 16"]);
    }

    #[test]
    fn test_operators_apply_left_to_right() {
        let mut engine = engine_with("2+3×");
        assert_eq!(engine.operand(), Some(5.0));
        assert_eq!(engine.operation_text(), "5 × ");
        assert_eq!(engine.display_text(), "5");

        press(&mut engine, "4=");
        assert_eq!(engine.display_text(), "20");
        assert_eq!(engine.history(), ["5 × 4 = 20"]);
    }

    #[test]
    fn test_second_decimal_point_is_rejected() {
        let engine = engine_with("1.2.3.");
        assert_eq!(engine.entry(), "1.23");
        assert_eq!(engine.entry().matches('.').count(), 1);
    }

    #[test]
    fn test_no_key_sequence_yields_two_decimal_points() {
        let keys = ['0', '5', '.'];
        let mut sequences = vec![String::new()];
        for _ in 0..5 {
            sequences = sequences
                .iter()
                .flat_map(|prefix| keys.iter().map(move |key| format!("{prefix}{key}")))
                .collect();

            for sequence in &sequences {
                let engine = engine_with(sequence);
                assert!(
                    engine.entry().matches('.').count() <= 1,
                    "{sequence:?} -> {:?}",
                    engine.entry()
                );
            }
        }
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        assert_eq!(engine_with("05").entry(), "5");
        assert_eq!(engine_with("0.").entry(), ".");
        assert_eq!(engine_with("0.5").entry(), ".5");
        assert_eq!(engine_with("50").entry(), "50");
    }

    #[test]
    fn test_non_digit_keys_are_ignored() {
        let mut engine = Engine::new();
        engine.append_digit('a');
        assert_eq!(engine.entry(), "");
        assert_eq!(engine.display_text(), "0");
    }

    #[test]
    fn test_digit_after_result_starts_over() {
        let mut engine = engine_with("5+3=");
        press(&mut engine, "2");
        assert_eq!(engine.display_text(), "2");
        assert_eq!(engine.operation_text(), "");
        assert_eq!(engine.operand(), None);
        assert!(!engine.is_after_equals());
    }

    #[test]
    fn test_operator_with_nothing_typed_postpones() {
        let engine = engine_with("+");
        assert_eq!(engine.operand(), None);
        assert_eq!(engine.pending_operator(), Some(Operator::Add));
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.operation_text(), " + ");
    }

    #[test]
    fn test_operator_can_be_replaced() {
        let engine = engine_with("6+-");
        assert_eq!(engine.operand(), Some(6.0));
        assert_eq!(engine.pending_operator(), Some(Operator::Subtract));
        assert_eq!(engine.operation_text(), "6 - ");
    }

    #[test]
    fn test_unparsable_entry_blocks_operator() {
        let engine = engine_with("0.+");
        assert_eq!(engine.entry(), ".");
        assert_eq!(engine.pending_operator(), None);
        assert_eq!(engine.operand(), None);
    }

    #[test]
    fn test_division_by_zero_keeps_dividend() {
        let mut engine = engine_with("8÷0=");
        assert_eq!(engine.display_text(), "8");
        assert_eq!(engine.history(), ["8 ÷ 0 = 8"]);
        assert_eq!(engine.take_notices(), [Notice::DivisionByZero]);
        assert!(engine.take_notices().is_empty());
    }

    #[test]
    fn test_equals_requires_pending_operation() {
        let engine = engine_with("5=");
        assert!(engine.history().is_empty());
        assert_eq!(engine.display_text(), "5");
        assert!(!engine.is_after_equals());

        let engine = engine_with("5+=");
        assert!(engine.history().is_empty());
        assert_eq!(engine.display_text(), "5");
        assert_eq!(engine.operation_text(), "5 + ");
    }

    #[test]
    fn test_fractional_results_are_formatted() {
        let engine = engine_with("1÷3=");
        assert_eq!(engine.display_text(), "0.3333333333");
        assert_eq!(engine.history(), ["1 ÷ 3 = 0.3333333333"]);
    }

    #[test]
    fn test_square() {
        let mut engine = engine_with("4");
        engine.on_square();
        assert_eq!(engine.display_text(), "16");
        assert_eq!(engine.operation_text(), "sqr(4) =");
        assert_eq!(engine.history(), ["sqr(4) = 16"]);
        assert!(engine.is_after_equals());
    }

    #[test]
    fn test_square_clears_pending_operation() {
        let mut engine = engine_with("2+3");
        engine.on_square();
        assert_eq!(engine.display_text(), "9");
        assert_eq!(engine.operand(), None);
        assert_eq!(engine.pending_operator(), None);
    }

    #[test]
    fn test_reciprocal() {
        let mut engine = engine_with("4");
        engine.on_reverse();
        assert_eq!(engine.display_text(), "0.25");
        assert_eq!(engine.history(), ["1/(4) = 0.25"]);
        assert!(engine.take_notices().is_empty());
    }

    #[test]
    fn test_reciprocal_of_zero() {
        let mut engine = engine_with("0");
        engine.on_reverse();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.history(), ["1/(0) = 0"]);
        assert_eq!(engine.take_notices(), [Notice::DivisionByZero]);
    }

    #[test]
    fn test_unary_needs_an_entry() {
        let mut engine = Engine::new();
        engine.on_square();
        engine.on_reverse();
        assert!(engine.history().is_empty());
        assert_eq!(engine.display_text(), "0");
    }

    #[test]
    fn test_backspace() {
        let mut engine = engine_with("123");
        engine.backspace();
        assert_eq!(engine.display_text(), "12");
        engine.backspace();
        engine.backspace();
        assert_eq!(engine.display_text(), "0");
    }

    #[test]
    fn test_backspace_on_empty_entry_is_noop() {
        let mut engine = Engine::new();
        engine.backspace();
        assert_eq!(engine.entry(), "");
        assert_eq!(engine.display_text(), "0");

        let mut engine = engine_with("5+");
        engine.backspace();
        assert_eq!(engine.operand(), Some(5.0));
        assert_eq!(engine.display_text(), "5");
    }

    #[test]
    fn test_pinned_result_survives_backspace() {
        let mut engine = engine_with("5+3=");
        engine.backspace();
        assert_eq!(engine.entry(), "");
        assert_eq!(engine.display_text(), "8");
        assert_eq!(engine.operation_text(), "5 + 3 =");
    }

    #[test]
    fn test_clear_entry_keeps_pending_operation() {
        let mut engine = engine_with("5+3");
        engine.clear_entry();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.operation_text(), "5 + ");

        press(&mut engine, "2=");
        assert_eq!(engine.history(), ["5 + 2 = 7"]);
    }

    #[test]
    fn test_clear_entry_after_result() {
        let mut engine = engine_with("5+3=");
        engine.clear_entry();
        assert!(!engine.is_after_equals());
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.operation_text(), "");
    }

    #[test]
    fn test_clear_all_keeps_memory_and_history() {
        let mut engine = engine_with("5+3=");
        engine.memory_op(MemoryOp::Store);
        press(&mut engine, "2+");
        engine.clear_all();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.operation_text(), "");
        assert_eq!(engine.operand(), None);
        assert_eq!(engine.pending_operator(), None);
        assert_eq!(engine.memory(), Some(8.0));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_toggle_sign() {
        let mut engine = engine_with("5");
        engine.toggle_sign();
        assert_eq!(engine.display_text(), "-5");
        engine.toggle_sign();
        assert_eq!(engine.display_text(), "5");
    }

    #[test]
    fn test_toggle_sign_on_zero_is_noop() {
        let mut engine = engine_with("0");
        engine.toggle_sign();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.entry(), "0");

        let mut engine = Engine::new();
        engine.toggle_sign();
        assert_eq!(engine.display_text(), "0");
        assert_eq!(engine.entry(), "");
    }

    #[test]
    fn test_toggle_sign_on_result() {
        let mut engine = engine_with("5+3=");
        engine.toggle_sign();
        assert!(!engine.is_after_equals());
        assert_eq!(engine.display_text(), "-8");
    }

    #[test]
    fn test_memory_survives_clear_all() {
        let mut engine = engine_with("7");
        engine.memory_op(MemoryOp::Store);
        engine.clear_all();
        engine.memory_op(MemoryOp::Recall);
        assert_eq!(engine.entry(), "7");
        assert_eq!(engine.display_text(), "7");
    }

    #[test]
    fn test_recall_without_memory_is_noop() {
        let mut engine = engine_with("5+3");
        engine.memory_op(MemoryOp::Recall);
        assert_eq!(engine.entry(), "3");
        assert_eq!(engine.operand(), Some(5.0));
    }

    #[test]
    fn test_recall_clears_pending_operation() {
        let mut engine = engine_with("9");
        engine.memory_op(MemoryOp::Store);
        press(&mut engine, "+1");
        engine.memory_op(MemoryOp::Recall);
        assert_eq!(engine.display_text(), "9");
        assert_eq!(engine.operation_text(), "");
        assert_eq!(engine.operand(), None);
        assert_eq!(engine.pending_operator(), None);
    }

    #[test]
    fn test_memory_add_and_subtract() {
        let mut engine = engine_with("4");
        engine.memory_op(MemoryOp::Add);
        assert_eq!(engine.memory(), Some(4.0));
        assert!(engine.is_after_equals());

        press(&mut engine, "10");
        engine.memory_op(MemoryOp::Add);
        assert_eq!(engine.memory(), Some(14.0));

        press(&mut engine, "3");
        engine.memory_op(MemoryOp::Subtract);
        assert_eq!(engine.memory(), Some(11.0));

        engine.memory_op(MemoryOp::Clear);
        assert!(!engine.is_memory_set());

        press(&mut engine, "2");
        engine.memory_op(MemoryOp::Subtract);
        assert_eq!(engine.memory(), Some(-2.0));
    }

    #[test]
    fn test_memory_uses_displayed_operand() {
        let mut engine = engine_with("6+");
        engine.memory_op(MemoryOp::Store);
        assert_eq!(engine.memory(), Some(6.0));
    }

    #[test]
    fn test_memory_ignores_unparsable_display() {
        let mut engine = engine_with("0.");
        engine.memory_op(MemoryOp::Store);
        assert!(!engine.is_memory_set());
    }

    #[test]
    fn test_memory_add_leaves_pending_operation() {
        let mut engine = engine_with("5+3");
        engine.memory_op(MemoryOp::Add);
        assert_eq!(engine.memory(), Some(3.0));
        assert_eq!(engine.operand(), Some(5.0));
        assert_eq!(engine.pending_operator(), Some(Operator::Add));
        assert!(engine.is_after_equals());

        // The entry becomes the operand, then the old pending `+` is applied to it.
        engine.on_operator(Operator::Multiply);
        assert_eq!(engine.operand(), Some(6.0));
        assert_eq!(engine.operation_text(), "6 × ");
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let mut engine = Engine::new();
        for action in [
            Action::Digit('9'),
            Action::Square,
            Action::Operator(Operator::Subtract),
            Action::Digit('1'),
            Action::Equals,
            Action::Memory(MemoryOp::Store),
            Action::ToggleSign,
        ] {
            engine.dispatch(action);
        }
        assert_eq!(engine.display_text(), "-80");
        assert_eq!(engine.memory(), Some(80.0));
        assert_eq!(engine.history(), ["sqr(9) = 81", "81 - 1 = 80"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut engine = engine_with("5+3=");
        engine.memory_op(MemoryOp::Store);
        press(&mut engine, "×4");

        let restored = Engine::restore(engine.snapshot());
        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.display_text(), "4");
        assert_eq!(restored.operation_text(), "8 × ");
        assert!(restored.is_memory_set());
    }

    #[test]
    fn test_restore_pins_last_history_record() {
        let engine = engine_with("5+3=");
        let restored = Engine::restore(engine.snapshot());
        assert!(restored.is_after_equals());
        assert_eq!(restored.display_text(), "8");
        assert_eq!(restored.operation_text(), "5 + 3 = 8");
    }

    #[test]
    fn test_restore_without_history() {
        let restored = Engine::restore(Snapshot {
            after_equals: true,
            entry: "12".to_string(),
            ..Default::default()
        });
        assert_eq!(restored.display_text(), "12");
        assert_eq!(restored.operation_text(), "");
    }

    #[test]
    fn test_infinite_memory_and_operand_survive_save() {
        let mut engine = engine_with("10000000000");
        for _ in 0..5 {
            engine.on_square();
        }
        assert_eq!(engine.entry(), "inf");

        engine.memory_op(MemoryOp::Store);
        engine.on_operator(Operator::Add);
        assert_eq!(engine.memory(), Some(f64::INFINITY));
        assert_eq!(engine.operand(), Some(f64::INFINITY));

        let json = engine.snapshot().to_json().unwrap();
        let restored = Engine::restore(Snapshot::from_json(&json).unwrap());
        assert_eq!(restored.memory(), Some(f64::INFINITY));
        assert_eq!(restored.operand(), Some(f64::INFINITY));
        assert_eq!(restored.operation_text(), "inf + ");
    }
}
