//! Answer option shuffling with identity-based correct-answer remapping.

use rand::Rng;

use crate::model::{QuestionRecord, WorkingQuestion};
use crate::shuffle::shuffle;

/// Shuffle the options of `record` and recompute its correct set.
///
/// Every option keeps its bank index as [`OptionId`](crate::model::OptionId)
/// through the shuffle; the new correct set is the positions whose id was
/// correct in the bank. Identical option texts therefore cannot be confused.
pub fn remap<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> WorkingQuestion {
    let mut question = WorkingQuestion::from_record(record);
    shuffle(&mut question.options, rng);

    question.correct = question
        .options
        .iter()
        .enumerate()
        .filter(|(_, option)| record.correct_answer.contains(&option.id.0))
        .map(|(position, _)| position)
        .collect();

    question
}
