//! Collections behind the portal's listing views.
//!
//! The portal has no data backend of its own yet, so each listing is seeded in-process.
//! Column sets are defined next to their record type so every view renders a listing the
//! same way.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::table::{Column, FieldValue, Record, TabularView};

// --- Renderers ---

/// Capitalized status label (`pending` -> `Pending`).
pub fn status_badge(value: &FieldValue) -> String {
    let raw = value.to_string();
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Medium date (`Jun 15, 2023`) from an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
/// Unparseable input is shown as-is.
pub fn medium_date(value: &FieldValue) -> String {
    let raw = value.to_string();
    let date = DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw,
    }
}

// --- Employer Requests (admin) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployerRequest {
    pub id: i64,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub industry: String,
    pub size: String,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    pub date_submitted: String,
}

impl Record for EmployerRequest {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("companyName", (&self.company_name).into()),
            ("contactPerson", (&self.contact_person).into()),
            ("email", (&self.email).into()),
            ("phone", (&self.phone).into()),
            ("industry", (&self.industry).into()),
            ("size", (&self.size).into()),
            ("status", (&self.status).into()),
            ("dateSubmitted", (&self.date_submitted).into()),
        ]
    }
}

pub fn employer_request_view(page_size: usize) -> TabularView<EmployerRequest> {
    let columns = vec![
        Column::new("Company", "companyName").sortable(),
        Column::new("Contact Person", "contactPerson").sortable(),
        Column::new("Industry", "industry").sortable(),
        Column::new("Size", "size").sortable(),
        Column::new("Date Submitted", "dateSubmitted")
            .sortable()
            .render_with(|value, _| medium_date(value)),
        Column::new("Status", "status")
            .sortable()
            .render_with(|value, _| status_badge(value)),
    ];
    TabularView::new(columns, "id", page_size).with_rows(seed_employer_requests())
}

pub fn seed_employer_requests() -> Vec<EmployerRequest> {
    let rows = [
        (
            1,
            "Tech Innovations Ltd",
            "John Smith",
            "john.smith@techinnovations.com",
            "+254 712 345 678",
            "Technology",
            "50-200",
            "pending",
            "2023-06-15T09:24:00Z",
        ),
        (
            2,
            "Global Finance Inc",
            "Sarah Johnson",
            "sarah.j@globalfinance.com",
            "+254 723 456 789",
            "Finance",
            "200-500",
            "approved",
            "2023-06-14T10:15:00Z",
        ),
        (
            3,
            "Creative Minds",
            "Emma Williams",
            "emma@creativeminds.co.ke",
            "+254 734 567 890",
            "Design",
            "10-50",
            "rejected",
            "2023-06-13T14:30:00Z",
        ),
        (
            4,
            "Future Technologies",
            "Michael Wong",
            "michael@futuretech.com",
            "+254 745 678 901",
            "Technology",
            "50-200",
            "pending",
            "2023-06-12T11:45:00Z",
        ),
        (
            5,
            "Eco Solutions",
            "David Kariuki",
            "david@ecosolutions.co.ke",
            "+254 756 789 012",
            "Environmental",
            "10-50",
            "pending",
            "2023-06-11T08:20:00Z",
        ),
    ];
    rows.into_iter()
        .map(
            |(id, company, contact, email, phone, industry, size, status, date)| EmployerRequest {
                id,
                company_name: company.to_string(),
                contact_person: contact.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                industry: industry.to_string(),
                size: size.to_string(),
                status: status.to_string(),
                date_submitted: date.to_string(),
            },
        )
        .collect()
}

// --- Job Postings (graduate job search) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: String,
    pub job_type: String,
    pub salary: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    pub featured: bool,
}

impl Record for JobPosting {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("title", (&self.title).into()),
            ("company", (&self.company).into()),
            ("location", (&self.location).into()),
            ("postedDate", (&self.posted_date).into()),
            ("jobType", (&self.job_type).into()),
            ("salary", self.salary.as_ref().into()),
            ("description", (&self.description).into()),
            ("skills", self.skills.join(", ").into()),
            ("featured", self.featured.into()),
        ]
    }
}

pub fn job_posting_view(page_size: usize) -> TabularView<JobPosting> {
    let columns = vec![
        Column::new("Title", "title")
            .sortable()
            .render_with(|value, job: &JobPosting| {
                if job.featured {
                    format!("{} (Featured)", value)
                } else {
                    value.to_string()
                }
            }),
        Column::new("Company", "company").sortable(),
        Column::new("Location", "location").sortable(),
        Column::new("Type", "jobType").sortable(),
        Column::new("Salary", "salary").render_with(|value, _| {
            if value.is_missing() {
                "Not disclosed".to_string()
            } else {
                value.to_string()
            }
        }),
        Column::new("Posted", "postedDate")
            .sortable()
            .render_with(|value, _| medium_date(value)),
    ];
    TabularView::new(columns, "id", page_size).with_rows(seed_job_postings())
}

pub fn seed_job_postings() -> Vec<JobPosting> {
    let rows = [
        (
            1,
            "Junior Software Developer",
            "TechStart Inc.",
            "Nairobi, Kenya",
            "2024-03-12",
            "Full-time",
            Some("KES 70,000 - 90,000"),
            "Great opportunity for recent graduates with knowledge of modern JavaScript frameworks.",
            &["JavaScript", "React", "Git"][..],
            true,
        ),
        (
            2,
            "Graduate Trainee - Data Science",
            "Data Insights Ltd",
            "Remote",
            "2024-03-14",
            "Full-time",
            None,
            "Join our 6-month graduate trainee program focused on data science and machine learning.",
            &["Python", "Data Analysis", "Statistics"][..],
            false,
        ),
        (
            3,
            "UI/UX Design Intern",
            "Creative Solutions",
            "Mombasa, Kenya",
            "2024-03-10",
            "Internship",
            Some("KES 30,000"),
            "Learn and apply UI/UX design principles in real-world projects.",
            &["Figma", "UI Design", "Prototyping"][..],
            false,
        ),
        (
            4,
            "Graduate DevOps Engineer",
            "Cloud Systems",
            "Nairobi, Kenya",
            "2024-03-13",
            "Contract",
            None,
            "DevOps position perfect for recent IT or Computer Science graduates.",
            &["AWS", "Docker", "CI/CD", "Linux"][..],
            false,
        ),
        (
            5,
            "Junior Content Developer",
            "Digital Media Agency",
            "Remote",
            "2024-03-15",
            "Part-time",
            None,
            "Create engaging content for multiple digital platforms.",
            &["Content Writing", "SEO", "Social Media"][..],
            false,
        ),
    ];
    rows.into_iter()
        .map(
            |(
                id,
                title,
                company,
                location,
                posted,
                job_type,
                salary,
                description,
                skills,
                featured,
            )| JobPosting {
                id,
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
                posted_date: posted.to_string(),
                job_type: job_type.to_string(),
                salary: salary.map(str::to_string),
                description: description.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                featured,
            },
        )
        .collect()
}

// --- Graduate Profiles (employer search) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GraduateProfile {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub location: String,
    pub education: String,
    pub graduation_year: i32,
    pub skills: Vec<String>,
    pub experience: String,
    pub is_shortlisted: bool,
}

impl Record for GraduateProfile {
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", self.id.into()),
            ("name", (&self.name).into()),
            ("title", (&self.title).into()),
            ("location", (&self.location).into()),
            ("education", (&self.education).into()),
            ("graduationYear", self.graduation_year.into()),
            ("skills", self.skills.join(", ").into()),
            ("experience", (&self.experience).into()),
            ("isShortlisted", self.is_shortlisted.into()),
        ]
    }
}

pub fn graduate_profile_view(page_size: usize) -> TabularView<GraduateProfile> {
    let columns = vec![
        Column::new("Name", "name").sortable(),
        Column::new("Title", "title").sortable(),
        Column::new("Location", "location").sortable(),
        Column::new("Graduation Year", "graduationYear").sortable(),
        Column::new("Skills", "skills"),
        Column::new("Shortlisted", "isShortlisted").render_with(|value, _| {
            match value {
                FieldValue::Bool(true) => "Yes".to_string(),
                _ => "No".to_string(),
            }
        }),
    ];
    TabularView::new(columns, "id", page_size).with_rows(seed_graduate_profiles())
}

pub fn seed_graduate_profiles() -> Vec<GraduateProfile> {
    let rows = [
        (
            1,
            "Jane Smith",
            "Frontend Developer",
            "Nairobi, Kenya",
            "BSc Computer Science, University of Nairobi",
            2023,
            &["JavaScript", "React", "TypeScript", "HTML/CSS", "UI/UX"][..],
            "1 year internship",
            false,
        ),
        (
            2,
            "Michael Chen",
            "Data Scientist",
            "Remote",
            "MSc Data Science, Strathmore University",
            2022,
            &["Python", "Machine Learning", "SQL", "Data Analysis", "Statistics"][..],
            "6 months internship",
            true,
        ),
        (
            3,
            "Sarah Johnson",
            "UX/UI Designer",
            "Mombasa, Kenya",
            "BA in Design, Moi University",
            2023,
            &["Figma", "Adobe XD", "UI Design", "User Research", "Prototyping"][..],
            "Freelance",
            false,
        ),
        (
            4,
            "David Mwangi",
            "Backend Developer",
            "Nairobi, Kenya",
            "BSc Information Technology, JKUAT",
            2022,
            &["Node.js", "Express", "MongoDB", "API Design", "GraphQL"][..],
            "1 year",
            false,
        ),
    ];
    rows.into_iter()
        .map(
            |(id, name, title, location, education, year, skills, experience, shortlisted)| {
                GraduateProfile {
                    id,
                    name: name.to_string(),
                    title: title.to_string(),
                    location: location.to_string(),
                    education: education.to_string(),
                    graduation_year: year,
                    skills: skills.iter().map(|s| s.to_string()).collect(),
                    experience: experience.to_string(),
                    is_shortlisted: shortlisted,
                }
            },
        )
        .collect()
}
