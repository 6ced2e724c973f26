use super::{EnquiryId, ProjectId, UserId};

/// An applicant enquiry about a project.
///
/// The manager and officer links are a snapshot taken when the enquiry was
/// created; later staffing changes on the project do not propagate here.
#[derive(Debug, Clone, PartialEq)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub filer: UserId,
    pub project: ProjectId,
    pub project_manager: Option<UserId>,
    pub project_officers: Vec<UserId>,
    question: String,
    reply: Option<String>,
}

impl Enquiry {
    pub fn new(
        id: EnquiryId,
        filer: UserId,
        project: ProjectId,
        project_manager: Option<UserId>,
        project_officers: Vec<UserId>,
        question: String,
        reply: Option<String>,
    ) -> Self {
        Self {
            id,
            filer,
            project,
            project_manager,
            project_officers,
            question,
            reply,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn reply(&self) -> Option<&str> {
        self.reply.as_deref()
    }

    /// A non-blank reply freezes the enquiry from the filer's side.
    pub fn is_locked(&self) -> bool {
        self.reply
            .as_deref()
            .is_some_and(|reply| !reply.trim().is_empty())
    }

    /// Rewrites the question. Fails once a staff reply exists.
    pub fn set_question(&mut self, question: String) -> bool {
        if self.is_locked() {
            return false;
        }
        self.question = question;
        true
    }

    pub fn set_reply(&mut self, reply: String) {
        self.reply = Some(reply);
    }
}
