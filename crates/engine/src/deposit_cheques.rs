//! Join rows linking a cash deposit to the cheques it carries.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deposit_cheques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub deposit_id: Uuid,
    pub cheque_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deposits::Entity",
        from = "Column::DepositId",
        to = "super::deposits::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Deposits,
    #[sea_orm(
        belongs_to = "super::cheques::Entity",
        from = "Column::ChequeId",
        to = "super::cheques::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Cheques,
}

impl Related<super::deposits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deposits.def()
    }
}

impl Related<super::cheques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cheques.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
