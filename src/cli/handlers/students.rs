//! Students command handler
//!
//! The terminal front end of the registration form. Every operation goes
//! through [`StudentClient`] against a running server; a failed call prints a
//! notification and the error is returned to the caller.

use std::io::{self, BufRead, Write};

use jiff::{Timestamp, Zoned};

use crate::api::dto::{StudentRequest, StudentResponse};
use crate::cli::parser::{StudentCommand, StudentFormArgs};
use crate::client::{
    ClientError, ClientResult, FieldKind, REGISTRATION_FORM, StudentClient, encode_photo,
    new_registration, set_dob, validate_form,
};
use crate::config::settings::ClientConfig;

pub struct StudentsCommandHandler {
    client: StudentClient,
}

impl StudentsCommandHandler {
    pub fn new(client: StudentClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(StudentClient::from_config(config)?))
    }

    pub async fn execute(&self, command: &StudentCommand) -> ClientResult<()> {
        let result = match command {
            StudentCommand::List => self.list().await,
            StudentCommand::Get { id } => self.show(*id).await,
            StudentCommand::Search { query } => self.search(query.as_deref().unwrap_or("")).await,
            StudentCommand::Register { form } => self.register(form).await,
            StudentCommand::Update { id, form } => self.update(*id, form).await,
            StudentCommand::Delete { id, yes } => self.delete(*id, *yes).await,
        };

        if let Err(error) = &result {
            eprintln!("✗ {}", error);
        }
        result
    }

    async fn list(&self) -> ClientResult<()> {
        println!("Loading students...");
        let students = self.client.list().await?;
        print!("{}", render_table(&students));
        Ok(())
    }

    async fn show(&self, id: i32) -> ClientResult<()> {
        let student = self.client.get(id).await?;
        print!("{}", render_details(&student));
        Ok(())
    }

    async fn search(&self, query: &str) -> ClientResult<()> {
        let students = self.client.search_or_list(query).await?;
        print!("{}", render_table(&students));
        Ok(())
    }

    async fn register(&self, form: &StudentFormArgs) -> ClientResult<()> {
        let mut request = new_registration(Timestamp::now(), Zoned::now().date());
        apply_form_args(&mut request, form)?;
        validate_form(&request)?;

        let student = self.client.create(&request).await?;
        tracing::info!(id = student.id, registration_no = %student.registration_no, "Student registered");
        println!(
            "✓ Student registered successfully! Registration No: {}",
            student.registration_no
        );

        self.list().await
    }

    async fn update(&self, id: i32, form: &StudentFormArgs) -> ClientResult<()> {
        let mut request = StudentRequest::from(self.client.get(id).await?);
        apply_form_args(&mut request, form)?;
        validate_form(&request)?;

        let student = self.client.update(id, &request).await?;
        tracing::info!(id = student.id, "Student updated");
        println!("✓ Student updated successfully!");

        self.list().await
    }

    async fn delete(&self, id: i32, skip_confirmation: bool) -> ClientResult<()> {
        if !skip_confirmation && !confirm("Delete this student? [y/N] ")? {
            println!("Delete cancelled");
            return Ok(());
        }

        let deleted = self.client.delete(id).await?;
        tracing::info!(id, "Student deleted");
        println!("✓ {}", deleted.message);

        self.list().await
    }
}

fn confirm(prompt: &str) -> ClientResult<bool> {
    print!("{}", prompt);
    io::stdout().flush().map_err(ClientError::Terminal)?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(ClientError::Terminal)?;
    Ok(is_confirmation(&answer))
}

/// `y` or `yes`, in any case.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Overlays every flag that was given onto `request`.
///
/// Setting `--dob` recomputes `dobWords`; photo paths are read and encoded.
pub fn apply_form_args(request: &mut StudentRequest, form: &StudentFormArgs) -> ClientResult<()> {
    fn overlay(target: &mut Option<String>, value: &Option<String>) {
        if let Some(value) = value {
            *target = Some(value.clone());
        }
    }

    if let Some(value) = &form.registration_no {
        request.registration_no = value.clone();
    }
    if let Some(value) = &form.student_name {
        request.student_name = value.clone();
    }
    if let Some(value) = &form.father_name {
        request.father_name = value.clone();
    }
    if let Some(value) = &form.father_contact1 {
        request.father_contact1 = value.clone();
    }

    overlay(&mut request.student_type, &form.student_type);
    overlay(&mut request.class_name, &form.class_name);
    overlay(&mut request.mother_name, &form.mother_name);
    overlay(&mut request.father_contact2, &form.father_contact2);
    overlay(&mut request.sms_contact, &form.sms_contact);
    overlay(&mut request.gender, &form.gender);
    overlay(&mut request.fee_category, &form.fee_category);
    overlay(&mut request.bus_van, &form.bus_van);
    overlay(&mut request.hostel, &form.hostel);
    overlay(&mut request.library, &form.library);
    overlay(&mut request.address, &form.address);
    overlay(&mut request.village, &form.village);
    overlay(&mut request.district, &form.district);
    overlay(&mut request.state, &form.state);
    overlay(&mut request.remarks, &form.remarks);

    if form.dob.is_some() {
        set_dob(request, form.dob);
    }
    if form.admission_date.is_some() {
        request.admission_date = form.admission_date;
    }
    if let Some(path) = &form.student_photo {
        request.student_photo = Some(encode_photo(path)?);
    }
    if let Some(path) = &form.father_photo {
        request.father_photo = Some(encode_photo(path)?);
    }

    Ok(())
}

const TABLE_HEADERS: [&str; 6] = ["ID", "Reg. No.", "Name", "Class", "Father", "Contact"];

fn table_row(student: &StudentResponse) -> [String; 6] {
    [
        student.id.to_string(),
        student.registration_no.clone(),
        student.student_name.clone(),
        student.class_name.clone().unwrap_or_else(|| "-".to_string()),
        student.father_name.clone(),
        student.father_contact1.clone(),
    ]
}

/// Students as an aligned text table, or a notice when there are none.
pub fn render_table(students: &[StudentResponse]) -> String {
    if students.is_empty() {
        return "No students found\n".to_string();
    }

    let rows: Vec<[String; 6]> = students.iter().map(table_row).collect();
    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_line(&TABLE_HEADERS.map(String::from));
    out.push_str(&format_line(&widths.map(|w| "-".repeat(w))));
    for row in &rows {
        out.push_str(&format_line(row));
    }
    out.push_str(&format!("{} student(s)\n", students.len()));
    out
}

/// One record laid out in registration-form order.
pub fn render_details(student: &StudentResponse) -> String {
    let mut out = format!("Student #{}\n", student.id);
    let request = StudentRequest::from(student.clone());
    let label_width = REGISTRATION_FORM
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0);

    for field in REGISTRATION_FORM {
        let value = match (field.kind, field.value(&request)) {
            (_, None) => "-".to_string(),
            (FieldKind::Photo, Some(photo)) => format!("attached ({} bytes)", photo.len()),
            (_, Some(value)) => value,
        };
        out.push_str(&format!("{:<width$}  {}\n", field.label, value, width = label_width));
    }

    out.push_str(&format!("{:<width$}  {}\n", "Created", student.created_at, width = label_width));
    out.push_str(&format!("{:<width$}  {}\n", "Updated", student.updated_at, width = label_width));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn stored(id: i32, name: &str) -> StudentResponse {
        let request = StudentRequest {
            registration_no: format!("REG-{}", 1000 + id),
            class_name: Some("Class 3".to_string()),
            student_name: name.to_string(),
            father_name: "Ravi Rao".to_string(),
            father_contact1: "9876543210".to_string(),
            ..StudentRequest::default()
        };
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        StudentResponse {
            id,
            registration_no: request.registration_no,
            student_type: None,
            class_name: request.class_name,
            student_name: request.student_name,
            father_name: request.father_name,
            mother_name: None,
            father_contact1: request.father_contact1,
            father_contact2: None,
            dob: None,
            dob_words: None,
            gender: None,
            admission_date: date(2024, 6, 1),
            fee_category: None,
            bus_van: None,
            hostel: None,
            library: None,
            sms_contact: None,
            address: None,
            village: None,
            district: None,
            state: None,
            student_photo: None,
            father_photo: None,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_confirmation_answers() {
        for answer in ["y", "Y\n", " yes ", "YES"] {
            assert!(is_confirmation(answer), "{answer:?}");
        }
        for answer in ["", "n", "no", "yep"] {
            assert!(!is_confirmation(answer), "{answer:?}");
        }
    }

    #[test]
    fn test_apply_form_args_only_touches_given_fields() {
        let mut request = StudentRequest::from(stored(1, "Asha Rao"));
        let form = StudentFormArgs {
            class_name: Some("Class 4".to_string()),
            dob: Some(date(2015, 3, 21)),
            ..StudentFormArgs::default()
        };

        apply_form_args(&mut request, &form).unwrap();

        assert_eq!(request.class_name.as_deref(), Some("Class 4"));
        assert_eq!(request.student_name, "Asha Rao");
        assert_eq!(request.admission_date, Some(date(2024, 6, 1)));
        assert_eq!(request.dob_words.as_deref(), Some("21st March 2015"));
    }

    #[test]
    fn test_apply_form_args_rejects_non_image_photo() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"plain text, not an image").unwrap();

        let mut request = StudentRequest::default();
        let form = StudentFormArgs {
            student_photo: Some(file.path().to_path_buf()),
            ..StudentFormArgs::default()
        };
        assert!(matches!(
            apply_form_args(&mut request, &form),
            Err(ClientError::Form(_))
        ));
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), "No students found\n");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(&[stored(2, "Vikram Singh"), stored(1, "Asha Rao")]);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("ID  Reg. No.  Name"));
        assert!(lines[2].starts_with("2   REG-1002  Vikram Singh"));
        assert!(lines[3].starts_with("1   REG-1001  Asha Rao      Class 3"));
        assert_eq!(lines.last(), Some(&"2 student(s)"));
    }

    #[test]
    fn test_render_details_follows_form_order() {
        let mut student = stored(1, "Asha Rao");
        student.student_photo = Some("data:image/png;base64,AAAA".to_string());
        let details = render_details(&student);

        assert!(details.starts_with("Student #1\n"));
        let reg = details.find("Registration No.").unwrap();
        let name = details.find("Student Name").unwrap();
        assert!(reg < name);
        assert!(details.contains("attached (26 bytes)"));
        assert!(!details.contains("base64"));
    }
}
