//! XML export of the model. Write-only: nothing reads this file back.

use crate::domain::model::{MedicalCard, Passport, Pet, SaleRecord, VisitRecord};
use crate::domain::ports::Encoder;
use crate::domain::registry::Registry;
use crate::domain::services::Organization;
use crate::utils::error::{RegistryError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

const INDENT: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExport;

impl Encoder for XmlExport {
    fn encode(&self, registry: &Registry) -> Result<Vec<u8>> {
        let mut out = MarkupWriter::new();
        out.declaration()?;
        out.open("registry")?;

        out.open("owners")?;
        for owner in &registry.owners {
            out.open("owner")?;
            out.leaf("name", &owner.name)?;
            out.leaf("age", owner.age)?;
            out.leaf("gender", owner.gender)?;
            out.pets(owner.pets())?;
            out.close("owner")?;
        }
        out.close("owners")?;

        out.open("petshop")?;
        out.organization(&registry.petshop.organization)?;
        out.open("available_pets")?;
        for pet in registry.petshop.available() {
            out.pet(pet)?;
        }
        out.close("available_pets")?;
        out.open("sales")?;
        for sale in registry.petshop.sales() {
            out.sale(sale)?;
        }
        out.close("sales")?;
        out.close("petshop")?;

        out.open("vetclinic")?;
        out.organization(&registry.vetclinic.organization)?;
        out.open("records")?;
        for record in registry.vetclinic.records() {
            out.visit(record)?;
        }
        out.close("records")?;
        out.close("vetclinic")?;

        out.close("registry")?;
        Ok(out.finish())
    }
}

struct MarkupWriter {
    writer: Writer<Vec<u8>>,
}

impl MarkupWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', INDENT),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| RegistryError::XmlError {
                message: e.to_string(),
            })
    }

    fn declaration(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn open(&mut self, tag: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(tag)))
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    /// `<tag>value</tag>`, text escaped.
    fn leaf(&mut self, tag: &str, value: impl Display) -> Result<()> {
        let text = value.to_string();
        self.open(tag)?;
        self.emit(Event::Text(BytesText::new(&text)))?;
        self.close(tag)
    }

    fn organization(&mut self, organization: &Organization) -> Result<()> {
        self.leaf("name", &organization.name)?;
        self.leaf("address", &organization.address)
    }

    fn pets(&mut self, pets: &[Pet]) -> Result<()> {
        self.open("pets")?;
        for pet in pets {
            self.pet(pet)?;
        }
        self.close("pets")
    }

    fn pet(&mut self, pet: &Pet) -> Result<()> {
        let mut start = BytesStart::new("pet");
        start.push_attribute(("type", pet.kind().as_str()));
        self.emit(Event::Start(start))?;

        self.leaf("name", &pet.name)?;
        self.leaf("age", pet.age)?;
        self.leaf("gender", pet.gender)?;
        self.leaf("color", pet.color)?;
        self.leaf("breed", pet.breed())?;
        if let Some(passport) = pet.passport() {
            self.passport(passport)?;
        }
        self.medical_card(pet.medical_card())?;

        self.close("pet")
    }

    fn passport(&mut self, passport: &Passport) -> Result<()> {
        self.open("passport")?;
        self.leaf("pet_name", &passport.pet_name)?;
        self.leaf("age", passport.age)?;
        self.leaf("color", passport.color)?;
        self.leaf("gender", passport.gender)?;
        self.leaf("breed", passport.breed)?;
        self.leaf("issue_date", passport.issue_date.to_rfc3339())?;
        self.close("passport")
    }

    fn medical_card(&mut self, card: &MedicalCard) -> Result<()> {
        self.open("medical_card")?;
        self.leaf("pet_name", &card.pet_name)?;
        self.open("vaccinations")?;
        for label in card.vaccinations() {
            self.leaf("vaccination", label)?;
        }
        self.close("vaccinations")?;
        self.open("diseases")?;
        for label in card.diseases() {
            self.leaf("disease", label)?;
        }
        self.close("diseases")?;
        self.close("medical_card")
    }

    fn sale(&mut self, sale: &SaleRecord) -> Result<()> {
        self.open("sale")?;
        self.leaf("owner_name", &sale.owner_name)?;
        self.leaf("pet_name", &sale.pet_name)?;
        self.leaf("date", sale.date.to_rfc3339())?;
        self.close("sale")
    }

    fn visit(&mut self, record: &VisitRecord) -> Result<()> {
        self.open("record")?;
        self.leaf("pet_name", &record.pet_name)?;
        self.leaf("record_type", record.record_type)?;
        self.leaf("detail", &record.detail)?;
        self.leaf("date", record.date.to_rfc3339())?;
        self.close("record")
    }

    fn finish(self) -> Vec<u8> {
        let mut data = self.writer.into_inner();
        data.push(b'\n');
        data
    }
}
