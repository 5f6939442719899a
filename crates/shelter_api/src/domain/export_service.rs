use crate::domain::ListAnimalsRequest;
use chrono::{DateTime, NaiveDate, Utc};
use common::domain::{
    Animal, AnimalPhoto, AnimalRepository, DomainError, DomainResult,
    ListMedicalRecordsRepoInput, ListPhotosRepoInput, ListVaccinationsRepoInput, MedicalRecord,
    MedicalRecordRepository, PhotoRepository, Vaccination, VaccinationRepository,
};
use common::media::MediaStore;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MISSING: &str = "-";
const MAX_COLUMN_WIDTH: usize = 50;

const ANIMAL_HEADERS: &[&str] = &[
    "Chip ID",
    "Όνομα",
    "Είδος",
    "Φύλο",
    "Ηλικία",
    "Συμπεριφορά",
    "Κατάσταση Εμβολιασμού",
    "Στείρωση",
    "Κλουβί",
    "Τοποθεσία Εύρεσης",
    "Ημ/νία Εισαγωγής",
    "Κατάσταση Υιοθεσίας",
    "Δημόσια Προβολή",
    "Πλήθος Ιατρικών",
    "Πλήθος Εμβολιασμών",
];

const MEDICAL_HEADERS: &[&str] = &[
    "Chip ID Ζώου",
    "Όνομα Ζώου",
    "Τύπος Αρχείου",
    "Περιγραφή",
    "Ημερομηνία",
    "Δημιουργήθηκε από",
];

const VACCINATION_HEADERS: &[&str] = &[
    "Chip ID Ζώου",
    "Όνομα Ζώου",
    "Τύπος Εμβολίου",
    "Ημερομηνία",
    "Επόμενη Δόση",
    "Χορηγήθηκε από",
    "Αριθμός Παρτίδας",
];

const PHOTO_HEADERS: &[&str] = &[
    "Chip ID Ζώου",
    "Όνομα Ζώου",
    "Κύρια",
    "Λεζάντα",
    "Ανέβηκε στις",
    "URL Φωτογραφίας",
];

/// Spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn or_missing(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Cell::text(v),
            None => Cell::text(MISSING),
        }
    }

    fn display_len(&self) -> usize {
        match self {
            Cell::Text(text) => text.chars().count(),
            Cell::Number(number) => number.to_string().len(),
        }
    }
}

/// One worksheet: a header row followed by data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

/// An exported animal with its child records
#[derive(Debug, Clone)]
struct AnimalBundle {
    animal: Animal,
    medical_records: Vec<MedicalRecord>,
    vaccinations: Vec<Vaccination>,
    photos: Vec<AnimalPhoto>,
}

/// Rendered export file
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content: Vec<u8>,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value { "Ναι" } else { "Όχι" }
}

fn animal_row(animal: &Animal, medical_count: usize, vaccination_count: usize) -> Vec<Cell> {
    vec![
        Cell::text(&animal.chip_id),
        Cell::text(&animal.name),
        Cell::text(animal.species.label()),
        Cell::text(animal.gender.label()),
        Cell::text(animal.age().to_string()),
        Cell::text(animal.behavior.label()),
        Cell::text(animal.vaccination_status.label()),
        Cell::text(animal.sterilization_status.label()),
        Cell::Number(f64::from(animal.cage_number)),
        Cell::or_missing(Some(animal.capture_location.as_str())),
        Cell::text(format_date(animal.entry_date.date_naive())),
        Cell::text(animal.adoption_status.label()),
        Cell::text(yes_no(animal.public_visibility)),
        Cell::Number(medical_count as f64),
        Cell::Number(vaccination_count as f64),
    ]
}

fn medical_record_row(animal: &Animal, record: &MedicalRecord) -> Vec<Cell> {
    vec![
        Cell::text(&animal.chip_id),
        Cell::text(&animal.name),
        Cell::text(record.record_type.label()),
        Cell::text(&record.description),
        Cell::text(format_date(record.date_recorded)),
        Cell::or_missing(record.created_by.as_deref()),
    ]
}

fn vaccination_row(animal: &Animal, vaccination: &Vaccination) -> Vec<Cell> {
    vec![
        Cell::text(&animal.chip_id),
        Cell::text(&animal.name),
        Cell::text(vaccination.display_name()),
        Cell::text(format_date(vaccination.date_administered)),
        match vaccination.next_due_date {
            Some(date) => Cell::text(format_date(date)),
            None => Cell::text(MISSING),
        },
        Cell::or_missing(vaccination.administered_by.as_deref()),
        Cell::or_missing(vaccination.batch_number.as_deref()),
    ]
}

fn vaccinations_sheet(bundles: &[AnimalBundle]) -> Sheet {
    Sheet {
        name: "Εμβολιασμοί",
        headers: VACCINATION_HEADERS,
        rows: bundles
            .iter()
            .flat_map(|b| b.vaccinations.iter().map(|v| vaccination_row(&b.animal, v)))
            .collect(),
    }
}

/// Writes sheets into an xlsx workbook: styled, frozen header row and
/// columns sized to their content.
pub fn render_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x4472C4))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    for sheet in sheets {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(sheet.name)?;

        let mut widths: Vec<usize> = sheet.headers.iter().map(|h| h.chars().count()).collect();
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (index, row) in sheet.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row_num, col as u16, text)?,
                    Cell::Number(number) => worksheet.write_number(row_num, col as u16, *number)?,
                };
                if let Some(width) = widths.get_mut(col) {
                    *width = (*width).max(cell.display_len());
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        for (col, width) in widths.iter().enumerate() {
            let width = (width + 2).min(MAX_COLUMN_WIDTH);
            worksheet.set_column_width(col as u16, width as f64)?;
        }

        workbook.push_worksheet(worksheet);
    }

    workbook.save_to_buffer()
}

fn workbook_error(e: XlsxError) -> DomainError {
    DomainError::RepositoryError(anyhow::Error::new(e).context("failed to render workbook"))
}

/// Builds spreadsheet exports of the registry
pub struct ExportService {
    animal_repository: Arc<dyn AnimalRepository>,
    medical_record_repository: Arc<dyn MedicalRecordRepository>,
    vaccination_repository: Arc<dyn VaccinationRepository>,
    photo_repository: Arc<dyn PhotoRepository>,
    media_store: Arc<dyn MediaStore>,
}

impl ExportService {
    pub fn new(
        animal_repository: Arc<dyn AnimalRepository>,
        medical_record_repository: Arc<dyn MedicalRecordRepository>,
        vaccination_repository: Arc<dyn VaccinationRepository>,
        photo_repository: Arc<dyn PhotoRepository>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            animal_repository,
            medical_record_repository,
            vaccination_repository,
            photo_repository,
            media_store,
        }
    }

    /// Workbook with animals, medical records, vaccinations and photos of
    /// every animal matching the filter
    #[instrument(skip(self, filter))]
    pub async fn export_animals(&self, filter: ListAnimalsRequest) -> DomainResult<ExportFile> {
        let bundles = self.collect(filter).await?;

        let animals = Sheet {
            name: "Ζώα",
            headers: ANIMAL_HEADERS,
            rows: bundles
                .iter()
                .map(|b| animal_row(&b.animal, b.medical_records.len(), b.vaccinations.len()))
                .collect(),
        };
        let medical_records = Sheet {
            name: "Ιατρικά Αρχεία",
            headers: MEDICAL_HEADERS,
            rows: bundles
                .iter()
                .flat_map(|b| {
                    b.medical_records
                        .iter()
                        .map(|r| medical_record_row(&b.animal, r))
                })
                .collect(),
        };
        let photos = Sheet {
            name: "Φωτογραφίες",
            headers: PHOTO_HEADERS,
            rows: bundles
                .iter()
                .flat_map(|b| b.photos.iter().map(|p| self.photo_row(&b.animal, p)))
                .collect(),
        };

        let content = render_workbook(&[
            animals,
            medical_records,
            vaccinations_sheet(&bundles),
            photos,
        ])
        .map_err(workbook_error)?;

        info!(animals = bundles.len(), size = content.len(), "Animal export rendered");
        Ok(ExportFile {
            filename: format!("shelter_animals_{}.xlsx", Utc::now().format("%Y-%m-%d")),
            content,
        })
    }

    /// Workbook with a single vaccination sheet for the matching animals
    #[instrument(skip(self, filter))]
    pub async fn export_vaccinations(
        &self,
        filter: ListAnimalsRequest,
    ) -> DomainResult<ExportFile> {
        let bundles = self.collect(filter).await?;
        let content = render_workbook(&[vaccinations_sheet(&bundles)]).map_err(workbook_error)?;

        info!(animals = bundles.len(), size = content.len(), "Vaccination export rendered");
        Ok(ExportFile {
            filename: format!("shelter_vaccinations_{}.xlsx", Utc::now().format("%Y-%m-%d")),
            content,
        })
    }

    fn photo_row(&self, animal: &Animal, photo: &AnimalPhoto) -> Vec<Cell> {
        vec![
            Cell::text(&animal.chip_id),
            Cell::text(&animal.name),
            Cell::text(yes_no(photo.is_primary)),
            Cell::or_missing(Some(photo.caption.as_str())),
            Cell::text(format_timestamp(photo.uploaded_at)),
            Cell::text(self.media_store.url(&photo.image)),
        ]
    }

    async fn collect(&self, filter: ListAnimalsRequest) -> DomainResult<Vec<AnimalBundle>> {
        let animals = self
            .animal_repository
            .list_animals(filter.into_repo_input())
            .await?;
        debug!(count = animals.len(), "Collecting records for export");

        let mut bundles = Vec::with_capacity(animals.len());
        for animal in animals {
            let animal_id = animal.id;
            let medical_records = self
                .medical_record_repository
                .list_medical_records(ListMedicalRecordsRepoInput { animal_id })
                .await?;
            let vaccinations = self
                .vaccination_repository
                .list_vaccinations(ListVaccinationsRepoInput { animal_id })
                .await?;
            let photos = self
                .photo_repository
                .list_photos(ListPhotosRepoInput { animal_id })
                .await?;
            bundles.push(AnimalBundle {
                animal,
                medical_records,
                vaccinations,
                photos,
            });
        }
        Ok(bundles)
    }
}
