//! Clarification conversation that runs before the full threat model
//!
//! The flow walks the questions strictly in order:
//! `AwaitingAnswer(0) -> AwaitingAnswer(1) -> ... -> AllAnswered`.
//! Every transition only appends to the message log.

use serde::Serialize;
use virantis_common::{ClarificationQuestion, Error, Result};

const INTRO: &str = "I've analyzed your intake sources and have a few clarifying questions before running the full threat model. This helps me provide more accurate and relevant security recommendations.";
const ACKNOWLEDGEMENT: &str = "Got it, thank you. Here's my next question:";
const COMPLETION: &str = "Perfect! I have all the information I need. I'll now run a comprehensive threat analysis using STRIDE, PASTA, and OWASP Agentic frameworks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum FlowState {
    AwaitingAnswer(usize),
    AllAnswered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub is_question: bool,
}

impl Message {
    fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            is_question: false,
        }
    }

    fn question(index: usize, question: &ClarificationQuestion) -> Self {
        Self {
            id: format!("q{}-msg", index + 1),
            role: Role::Assistant,
            content: question.question.clone(),
            is_question: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClarificationFlow {
    questions: Vec<ClarificationQuestion>,
    state: FlowState,
    answers: Vec<Answer>,
    messages: Vec<Message>,
}

impl ClarificationFlow {
    /// Start a flow. With no questions it is complete immediately.
    pub fn new(questions: Vec<ClarificationQuestion>) -> Self {
        let mut messages = vec![Message::assistant("intro", INTRO)];

        let state = match questions.first() {
            Some(first) => {
                messages.push(Message::question(0, first));
                FlowState::AwaitingAnswer(0)
            }
            None => {
                messages.push(Message::assistant("complete", COMPLETION));
                FlowState::AllAnswered
            }
        };

        Self {
            questions,
            state,
            answers: Vec::new(),
            messages,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&ClarificationQuestion> {
        match self.state {
            FlowState::AwaitingAnswer(i) => self.questions.get(i),
            FlowState::AllAnswered => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == FlowState::AllAnswered
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.questions.len())
    }

    /// Record an answer to the current question and advance.
    ///
    /// Free-text answers are accepted as well as the suggested options.
    pub fn answer(&mut self, answer: impl Into<String>) -> Result<FlowState> {
        let index = match self.state {
            FlowState::AwaitingAnswer(i) => i,
            FlowState::AllAnswered => {
                return Err(Error::InvalidTransition(
                    "all clarification questions are already answered".to_string(),
                ))
            }
        };

        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(Error::InvalidTransition("answer cannot be empty".to_string()));
        }

        let question_id = self.questions[index].id.clone();
        self.messages.push(Message {
            id: format!("user-{}", index),
            role: Role::User,
            content: answer.clone(),
            is_question: false,
        });
        self.answers.push(Answer {
            question_id,
            answer,
        });

        let next = index + 1;
        self.state = match self.questions.get(next) {
            Some(question) => {
                self.messages
                    .push(Message::assistant(format!("ack-{}", index), ACKNOWLEDGEMENT));
                self.messages.push(Message::question(next, question));
                FlowState::AwaitingAnswer(next)
            }
            None => {
                self.messages.push(Message::assistant("complete", COMPLETION));
                FlowState::AllAnswered
            }
        };

        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<ClarificationQuestion> {
        (1..=n)
            .map(|i| ClarificationQuestion {
                id: format!("q{}", i),
                question: format!("Question {}?", i),
                options: vec!["Yes".to_string(), "No".to_string()],
            })
            .collect()
    }

    #[test]
    fn test_walks_questions_in_order() {
        let mut flow = ClarificationFlow::new(questions(3));
        assert_eq!(flow.state(), FlowState::AwaitingAnswer(0));
        assert_eq!(flow.messages().len(), 2);
        assert_eq!(flow.current_question().unwrap().id, "q1");

        assert_eq!(flow.answer("Yes").unwrap(), FlowState::AwaitingAnswer(1));
        // user answer + acknowledgement + next question
        assert_eq!(flow.messages().len(), 5);
        assert!(flow.messages()[4].is_question);
        assert_eq!(flow.messages()[4].content, "Question 2?");

        assert_eq!(flow.answer("No").unwrap(), FlowState::AwaitingAnswer(2));
        assert_eq!(flow.answer("Something custom").unwrap(), FlowState::AllAnswered);

        let last = flow.messages().last().unwrap();
        assert_eq!(last.id, "complete");
        assert_eq!(flow.progress(), (3, 3));
        assert_eq!(flow.answers()[2].answer, "Something custom");
        assert!(flow.current_question().is_none());
    }

    #[test]
    fn test_message_log_is_append_only() {
        let mut flow = ClarificationFlow::new(questions(2));
        let before: Vec<Message> = flow.messages().to_vec();
        flow.answer("Yes").unwrap();
        assert_eq!(&flow.messages()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_answer_after_completion_rejected() {
        let mut flow = ClarificationFlow::new(questions(1));
        flow.answer("Yes").unwrap();
        let err = flow.answer("again").unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
        assert_eq!(flow.progress(), (1, 1));
    }

    #[test]
    fn test_empty_answer_rejected() {
        let mut flow = ClarificationFlow::new(questions(1));
        assert!(flow.answer("   ").is_err());
        assert_eq!(flow.state(), FlowState::AwaitingAnswer(0));
    }

    #[test]
    fn test_no_questions_is_complete() {
        let flow = ClarificationFlow::new(Vec::new());
        assert!(flow.is_complete());
        assert_eq!(flow.messages().len(), 2);
    }
}
