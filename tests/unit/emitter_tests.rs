//! Unit tests for entity and repository emission
//!
//! Generated sources are compared in full so layout regressions show up as
//! a readable diff.

use pretty_assertions::assert_eq;

use rust_entitygen::codegen::{
    emit_entity, emit_repository, resolve_table_naming, GeneratedNamespaces,
};
use rust_entitygen::schema::{
    ColumnMetadata, ForeignKeyMetadata, IndexMetadata, SemanticType, TableMetadata,
};

fn namespaces_for(table: &str) -> GeneratedNamespaces {
    GeneratedNamespaces::new("App\\Entity", "App\\Repository", &resolve_table_naming(table))
}

fn emit(table: &TableMetadata, with_repository: bool) -> String {
    let naming = resolve_table_naming(&table.name);
    emit_entity(table, &naming, &namespaces_for(&table.name), with_repository)
}

fn user_profile() -> TableMetadata {
    TableMetadata {
        name: "user_profile".to_string(),
        columns: vec![
            ColumnMetadata::new("id", SemanticType::Integer).autoincrement(),
            ColumnMetadata::new("user_id", SemanticType::Integer),
            ColumnMetadata::new("display_name", SemanticType::String).length(120),
            ColumnMetadata::new("balance", SemanticType::Decimal)
                .precision(10, 2)
                .default_value("0.00"),
            ColumnMetadata::new("bio", SemanticType::Text).nullable(),
            ColumnMetadata::new("created_at", SemanticType::DateTime),
        ],
        indexes: vec![
            IndexMetadata::primary(["id"]),
            IndexMetadata::new("uniq_display_name", ["display_name"], true),
            IndexMetadata::new("idx_created_at", ["created_at"], false),
        ],
        foreign_keys: vec![ForeignKeyMetadata::new(["user_id"], "users", ["id"])],
    }
}

#[test]
fn test_entity_with_association_indexes_and_scalars() {
    let expected = r#"<?php

declare(strict_types=1);

namespace App\Entity\User;

use App\Repository\User\UserProfileRepository;
use App\Entity\Users\Users;
use Doctrine\DBAL\Types\Types;
use Doctrine\ORM\Mapping as ORM;

#[ORM\Entity(repositoryClass: UserProfileRepository::class)]
#[ORM\UniqueConstraint(name: 'uniq_display_name', columns: ['display_name'])]
#[ORM\Index(name: 'idx_created_at', columns: ['created_at'])]
#[ORM\Table(name: 'user_profile')]
class UserProfile
{
    #[ORM\ManyToOne(targetEntity: Users::class)]
    #[ORM\JoinColumn(name: 'user_id', referencedColumnName: 'id', nullable: false)]
    private Users $user;

    #[ORM\Id]
    #[ORM\GeneratedValue]
    #[ORM\Column(name: 'id', type: Types::INTEGER)]
    private int $id;

    #[ORM\Column(name: 'display_name', type: Types::STRING, length: 120)]
    private string $displayName;

    #[ORM\Column(name: 'balance', type: Types::DECIMAL, precision: 10, scale: 2, options: ['default' => '0.00'])]
    private float $balance;

    #[ORM\Column(name: 'bio', type: Types::TEXT, nullable: true)]
    private ?string $bio = null;

    #[ORM\Column(name: 'created_at', type: Types::DATETIME_IMMUTABLE)]
    private \DateTimeImmutable $createdAt;

    public function getUser(): Users
    {
        return $this->user;
    }

    public function setUser(Users $user): self
    {
        $this->user = $user;

        return $this;
    }

    public function getId(): int
    {
        return $this->id;
    }

    public function getDisplayName(): string
    {
        return $this->displayName;
    }

    public function setDisplayName(string $displayName): self
    {
        $this->displayName = $displayName;

        return $this;
    }

    public function getBalance(): float
    {
        return $this->balance;
    }

    public function setBalance(float $balance): self
    {
        $this->balance = $balance;

        return $this;
    }

    public function getBio(): ?string
    {
        return $this->bio;
    }

    public function setBio(?string $bio): self
    {
        $this->bio = $bio;

        return $this;
    }

    public function getCreatedAt(): \DateTimeImmutable
    {
        return $this->createdAt;
    }

    public function setCreatedAt(\DateTimeImmutable $createdAt): self
    {
        $this->createdAt = $createdAt;

        return $this;
    }

}
"#;

    assert_eq!(emit(&user_profile(), true), expected);
}

#[test]
fn test_repository_class() {
    let naming = resolve_table_naming("user_profile");
    let expected = r#"<?php

declare(strict_types=1);

namespace App\Repository\User;

use App\Entity\User\UserProfile;
use Doctrine\Bundle\DoctrineBundle\Repository\ServiceEntityRepository;
use Doctrine\Persistence\ManagerRegistry;

/**
 * @extends ServiceEntityRepository<UserProfile>
 */
class UserProfileRepository extends ServiceEntityRepository
{
    public function __construct(ManagerRegistry $registry)
    {
        parent::__construct($registry, UserProfile::class);
    }
}
"#;

    assert_eq!(
        emit_repository(&naming, &namespaces_for("user_profile")),
        expected
    );
}

#[test]
fn test_entity_without_repository() {
    let code = emit(&user_profile(), false);
    assert!(code.contains("\n#[ORM\\Entity]\n"));
    assert!(!code.contains("Repository"));
}

#[test]
fn test_emission_is_deterministic() {
    assert_eq!(emit(&user_profile(), true), emit(&user_profile(), true));
}

#[test]
fn test_nullable_association() {
    let table = TableMetadata {
        name: "posts".to_string(),
        columns: vec![ColumnMetadata::new("editor_id", SemanticType::Integer).nullable()],
        indexes: Vec::new(),
        foreign_keys: vec![ForeignKeyMetadata::new(["editor_id"], "users", ["id"])],
    };

    let code = emit(&table, false);
    assert!(code.contains(
        "    #[ORM\\JoinColumn(name: 'editor_id', referencedColumnName: 'id')]\n    private ?Users $editor = null;\n"
    ));
    assert!(code.contains("    public function setEditor(?Users $editor): self\n"));
    // The foreign key column has no scalar property of its own.
    assert!(!code.contains("name: 'editor_id', type:"));
}

#[test]
fn test_self_referencing_entity_does_not_import_itself() {
    let table = TableMetadata {
        name: "categories".to_string(),
        columns: vec![
            ColumnMetadata::new("id", SemanticType::Integer).autoincrement(),
            ColumnMetadata::new("parent_id", SemanticType::Integer).nullable(),
        ],
        indexes: vec![IndexMetadata::primary(["id"])],
        foreign_keys: vec![ForeignKeyMetadata::new(["parent_id"], "categories", ["id"])],
    };

    let code = emit(&table, true);
    assert!(!code.contains("use App\\Entity\\Categories\\Categories;"));
    assert!(code.contains("#[ORM\\ManyToOne(targetEntity: Categories::class)]"));
}

#[test]
fn test_identifier_detection_uses_property_name() {
    let table = TableMetadata {
        name: "legacy".to_string(),
        columns: vec![
            ColumnMetadata::new("ID", SemanticType::BigInt),
            ColumnMetadata::new("legacy_id", SemanticType::Integer),
        ],
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    };

    let code = emit(&table, false);
    assert_eq!(code.matches("#[ORM\\Id]").count(), 1);
    assert!(code.contains("    #[ORM\\Id]\n    #[ORM\\Column(name: 'ID', type: Types::BIGINT)]\n"));
    assert!(!code.contains("#[ORM\\GeneratedValue]"));
    assert!(!code.contains("function setId("));
    assert!(code.contains("function setLegacyId(int $legacyId): self"));
}

#[test]
fn test_scalar_property_colliding_with_association_is_suffixed() {
    let table = TableMetadata {
        name: "tasks".to_string(),
        columns: vec![
            ColumnMetadata::new("owner_id", SemanticType::Integer),
            ColumnMetadata::new("owner", SemanticType::String).nullable(),
        ],
        indexes: Vec::new(),
        foreign_keys: vec![ForeignKeyMetadata::new(["owner_id"], "people", ["id"])],
    };

    let code = emit(&table, false);
    assert!(code.contains("    private People $owner;\n"));
    assert!(code.contains("    private ?string $owner2 = null;\n"));
}

#[test]
fn test_literals_are_escaped() {
    let table = TableMetadata {
        name: "notes".to_string(),
        columns: vec![ColumnMetadata::new("label", SemanticType::String).default_value("it's C:\\")],
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    };

    let code = emit(&table, false);
    assert!(code.contains(r"options: ['default' => 'it\'s C:\\']"));
}

#[test]
fn test_zero_length_and_precision_are_omitted() {
    let table = TableMetadata {
        name: "measures".to_string(),
        columns: vec![
            ColumnMetadata::new("code", SemanticType::String).length(0),
            ColumnMetadata::new("amount", SemanticType::Decimal).precision(0, 0),
        ],
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    };

    let code = emit(&table, false);
    assert!(code.contains("#[ORM\\Column(name: 'code', type: Types::STRING)]"));
    assert!(code.contains("#[ORM\\Column(name: 'amount', type: Types::DECIMAL)]"));
}

#[test]
fn test_composite_index_columns() {
    let table = TableMetadata {
        name: "memberships".to_string(),
        columns: vec![
            ColumnMetadata::new("team_id", SemanticType::Integer),
            ColumnMetadata::new("person_id", SemanticType::Integer),
        ],
        indexes: vec![
            IndexMetadata::new("PRIMARY", ["team_id", "person_id"], true),
            IndexMetadata::new("idx_member", ["person_id", "team_id"], false),
        ],
        foreign_keys: Vec::new(),
    };

    let code = emit(&table, false);
    assert!(code.contains("#[ORM\\Index(name: 'idx_member', columns: ['person_id', 'team_id'])]\n"));
    assert!(!code.contains("name: 'PRIMARY'"));
}

#[test]
fn test_mapping_imports_are_aliased_on_name_clash() {
    let table = TableMetadata {
        name: "types".to_string(),
        columns: vec![
            ColumnMetadata::new("id", SemanticType::Integer).autoincrement(),
            ColumnMetadata::new("orm_id", SemanticType::Integer),
        ],
        indexes: vec![IndexMetadata::primary(["id"])],
        foreign_keys: vec![ForeignKeyMetadata::new(["orm_id"], "orm", ["id"])],
    };
    let code = emit(&table, false);

    assert!(code.contains("use App\\Entity\\Orm\\Orm;\n"));
    assert!(code.contains(
        "use Doctrine\\DBAL\\Types\\Types as DbalTypes;\nuse Doctrine\\ORM\\Mapping as DoctrineORM;\n\n"
    ));
    assert!(code.contains("#[DoctrineORM\\Entity]\n#[DoctrineORM\\Table(name: 'types')]\nclass Types\n"));
    assert!(code.contains("    #[DoctrineORM\\ManyToOne(targetEntity: Orm::class)]\n"));
    assert!(code.contains(
        "    #[DoctrineORM\\Id]\n    #[DoctrineORM\\GeneratedValue]\n    #[DoctrineORM\\Column(name: 'id', type: DbalTypes::INTEGER)]\n"
    ));
    assert!(!code.contains("#[ORM\\"));
    assert!(!code.contains(" Types::"));
}

#[test]
fn test_mapping_imports_keep_default_names_without_clash() {
    let code = emit(&user_profile(), true);
    assert!(code.contains("use Doctrine\\DBAL\\Types\\Types;\nuse Doctrine\\ORM\\Mapping as ORM;\n\n"));
}
