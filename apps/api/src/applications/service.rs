use tracing::info;

use crate::errors::AppError;
use crate::models::application::{Application, ApplyRequest, NewApplication};
use crate::models::resume::Resume;
use crate::store::{ApplicationSource, JobSource, ResumeSource};

/// Submits an application after checking the job exists and resolving the
/// resume: the explicit choice if given, otherwise the user's default.
pub async fn submit_application(
    jobs: &dyn JobSource,
    resumes: &dyn ResumeSource,
    applications: &dyn ApplicationSource,
    request: ApplyRequest,
) -> Result<Application, AppError> {
    let job = jobs.get(request.job_id).await?;
    let resume = resolve_resume(resumes, &request).await?;

    let application = applications
        .create(NewApplication {
            job_id: job.id,
            user_id: request.user_id,
            resume_id: resume.id,
            cover_letter: request.cover_letter,
        })
        .await?;

    info!(
        "User {} applied to job {} ({}) with resume {}",
        application.user_id, job.id, job.title, resume.id
    );
    Ok(application)
}

async fn resolve_resume(
    resumes: &dyn ResumeSource,
    request: &ApplyRequest,
) -> Result<Resume, AppError> {
    match request.resume_id {
        Some(id) => {
            let resume = resumes.get(id).await?;
            if resume.user_id != request.user_id {
                return Err(AppError::Validation(format!(
                    "Resume {id} does not belong to this user"
                )));
            }
            Ok(resume)
        }
        None => resumes.default_for(request.user_id).await?.ok_or_else(|| {
            AppError::Validation(
                "No resume selected and no default resume on file".to_string(),
            )
        }),
    }
}
