pub mod params;
pub mod records;

pub use params::{
    ContactValue, CustomProperties, CustomPropertyValue, EntityKind, NewClient, NewDeal, NewMessage,
    NewOrganization, NewTask, Note, OneOrMany, TaskKind,
};
pub use records::{Client, Deal, Funnel, Message, Organization, Property, Stage, Task, User};
